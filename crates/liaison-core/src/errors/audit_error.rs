//! Run-level audit errors.
//! Aggregates subsystem errors via `From` conversions.

use chrono::NaiveDate;

use super::{ConfigError, SourceError, VerifyError};
use crate::types::GuildId;

/// Errors that abort an audit run before or while it executes.
///
/// Per-record failures never appear here; they are accumulated in the
/// run summary so one bad record cannot take the run down.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Verification error: {0}")]
    Verify(#[from] VerifyError),

    #[error("audit for guild {guild_id} on {target_day} already running")]
    RunInProgress {
        guild_id: GuildId,
        target_day: NaiveDate,
    },

    #[error("Audit run cancelled")]
    Cancelled,
}
