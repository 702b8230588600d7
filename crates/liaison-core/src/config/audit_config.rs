//! Audit rule configuration.

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

/// Scope of the duplicate and quota rules.
///
/// The observed behavior protects each owner's roster independently;
/// `Global` widens both rules to every owner in the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuleScope {
    #[default]
    Owner,
    Global,
}

/// Configuration for the rule engine.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AuditConfig {
    /// Maximum partnership actions per manager per target day.
    /// Default: 5. Exactly the threshold is fine, one more flags.
    pub quota_threshold: Option<u32>,
    /// Minimum gap in minutes between reuses of one invite code.
    /// Default: 720. Must fit inside the one-day lookback window.
    pub cooldown_minutes: Option<i64>,
    /// Audit timezone as whole hours east of UTC. Target days are
    /// calendar days in this timezone. Default: 0.
    pub utc_offset_hours: Option<i32>,
    /// Scope of duplicate and quota detection. Default: per owner.
    pub scope: Option<RuleScope>,
}

impl AuditConfig {
    /// Returns the effective quota threshold, defaulting to 5.
    pub fn effective_quota_threshold(&self) -> u32 {
        self.quota_threshold.unwrap_or(5)
    }

    /// Returns the effective cooldown, defaulting to 12 hours.
    pub fn effective_cooldown(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.cooldown_minutes.unwrap_or(720))
    }

    /// Returns the effective rule scope, defaulting to per owner.
    pub fn effective_scope(&self) -> RuleScope {
        self.scope.unwrap_or_default()
    }

    /// Returns the audit timezone, defaulting to UTC. Out-of-range
    /// offsets (rejected by `validate`) fall back to UTC rather than
    /// panicking.
    pub fn effective_offset(&self) -> FixedOffset {
        self.utc_offset_hours
            .and_then(|hours| FixedOffset::east_opt(hours * 3600))
            .unwrap_or_else(|| Utc.fix())
    }
}
