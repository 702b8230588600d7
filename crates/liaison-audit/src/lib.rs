//! # liaison-audit
//!
//! Rule-based partnership audit engine. Scans one target day of
//! partnership promotion records per owner, correlates them across a
//! rolling two-day window, verifies invite codes against the
//! platform's public endpoint, and forwards advisory flags to a
//! review sink. Flags are advisory only: nothing here blocks a
//! submission or penalizes an actor.

pub mod attribution;
pub mod extract;
pub mod fingerprint;
pub mod linkscan;
pub mod quota;
pub mod report;
pub mod rules;
pub mod runner;
pub mod verify;
pub mod window;

pub use report::TracingSink;
pub use rules::{AuditRunContext, PreparedRecord};
pub use runner::{target_day_before, AuditRunner, RecordFailure, RunRequest, RunSummary};
pub use verify::{HttpInviteLookup, VerifierCache};
pub use window::WindowIndex;
