//! Configuration for the audit engine.

pub mod audit_config;
pub mod liaison_config;
pub mod verify_config;

pub use audit_config::{AuditConfig, RuleScope};
pub use liaison_config::LiaisonConfig;
pub use verify_config::VerifyConfig;
