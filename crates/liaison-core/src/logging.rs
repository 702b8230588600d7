//! Tracing subscriber setup for bot hosts and tests.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber from `LIAISON_LOG`,
/// falling back to `info`. Later calls are no-ops, so hosts and test
/// harnesses can both call this unconditionally.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("LIAISON_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
