//! # liaison-core
//!
//! Foundation crate for the Liaison partnership audit engine.
//! Defines the domain types, boundary traits, errors, configuration,
//! and logging setup. The engine crate depends on this; nothing here
//! performs I/O beyond config loading.

pub mod config;
pub mod errors;
pub mod logging;
pub mod traits;
pub mod types;

// Re-export the most commonly used items at the crate root.
pub use config::LiaisonConfig;
pub use errors::{AuditError, ConfigError, SinkError, SourceError, VerifyError};
pub use traits::{Cancellable, CancellationToken, FlagSink, InviteLookup, MessageResolver, RecordSource};
pub use types::{ActionType, AuditFlag, FlagReport, InviteCode, PartnershipRecord, Reason, Verification};
