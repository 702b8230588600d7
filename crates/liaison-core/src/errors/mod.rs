//! Error handling for Liaison.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod audit_error;
pub mod config_error;
pub mod sink_error;
pub mod source_error;
pub mod verify_error;

pub use audit_error::AuditError;
pub use config_error::ConfigError;
pub use sink_error::SinkError;
pub use source_error::SourceError;
pub use verify_error::VerifyError;
