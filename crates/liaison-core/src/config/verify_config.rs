//! Invite verification configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default base URL of the platform's public API.
pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

/// Configuration for the external invite lookup.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct VerifyConfig {
    /// Base URL of the platform API. Default: the public endpoint.
    pub api_base: Option<String>,
    /// Per-lookup timeout in seconds. Default: 15.
    pub timeout_secs: Option<u64>,
}

impl VerifyConfig {
    /// Returns the effective API base without a trailing slash.
    pub fn effective_api_base(&self) -> String {
        self.api_base
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/')
            .to_string()
    }

    /// Returns the effective per-lookup timeout, defaulting to 15s.
    pub fn effective_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(15))
    }
}
