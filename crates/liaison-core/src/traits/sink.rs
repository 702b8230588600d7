//! The review sink boundary.

use crate::errors::SinkError;
use crate::types::FlagReport;

/// Where flag reports go for human review. Delivery is best-effort:
/// the runner logs failures and continues, and nothing downstream can
/// act on an actor automatically.
pub trait FlagSink: Send + Sync {
    fn deliver(&self, report: &FlagReport) -> Result<(), SinkError>;
}
