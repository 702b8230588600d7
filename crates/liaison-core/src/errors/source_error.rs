//! Record source and message resolution errors.

/// Errors raised by the external record store or message fetch.
///
/// `ContentUnavailable` is always recovered per record (the record is
/// audited with an empty fingerprint); `Unavailable` fails the fetch
/// for one owner and is accumulated into the run summary.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("record store unavailable: {message}")]
    Unavailable { message: String },

    #[error("message text unavailable: {message}")]
    ContentUnavailable { message: String },
}
