//! Flag sink errors.

/// Delivery failure for one flag report. Best-effort: the runner logs
/// and moves on, already-computed flags are unaffected.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("flag delivery failed: {message}")]
    DeliveryFailed { message: String },
}
