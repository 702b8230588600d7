//! Boundary traits for the audit engine's external collaborators,
//! plus cooperative cancellation.

pub mod cancellation;
pub mod sink;
pub mod source;
pub mod verify;

pub use cancellation::{Cancellable, CancellationToken};
pub use sink::FlagSink;
pub use source::{MessageResolver, RecordSource};
pub use verify::InviteLookup;
