//! Top-level Liaison configuration with 3-layer resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{AuditConfig, VerifyConfig};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`LIAISON_*`)
/// 2. Project config (`liaison.toml` in the deployment root)
/// 3. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LiaisonConfig {
    pub audit: AuditConfig,
    pub verify: VerifyConfig,
}

impl LiaisonConfig {
    /// Load configuration with 3-layer resolution.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 2: project config
        let project_config_path = root.join("liaison.toml");
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 1 (highest priority): environment variables
        Self::apply_env_overrides(&mut config);

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &LiaisonConfig) -> Result<(), ConfigError> {
        if let Some(threshold) = config.audit.quota_threshold {
            if threshold == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "audit.quota_threshold".to_string(),
                    message: "must be at least 1".to_string(),
                });
            }
        }
        if let Some(minutes) = config.audit.cooldown_minutes {
            // The window index only looks back one calendar day, so a
            // cooldown longer than that could not be enforced.
            if !(0..=1440).contains(&minutes) {
                return Err(ConfigError::ValidationFailed {
                    field: "audit.cooldown_minutes".to_string(),
                    message: "must be between 0 and 1440".to_string(),
                });
            }
        }
        if let Some(hours) = config.audit.utc_offset_hours {
            if !(-12..=14).contains(&hours) {
                return Err(ConfigError::ValidationFailed {
                    field: "audit.utc_offset_hours".to_string(),
                    message: "must be between -12 and 14".to_string(),
                });
            }
        }
        if let Some(secs) = config.verify.timeout_secs {
            if secs == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "verify.timeout_secs".to_string(),
                    message: "must be at least 1".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut LiaisonConfig, path: &Path) -> Result<(), ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
                path: path.display().to_string(),
            })?;

        let file_config: LiaisonConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`, where `other` values override `base`
    /// values only when `other` has a `Some` value.
    fn merge(base: &mut LiaisonConfig, other: &LiaisonConfig) {
        // Audit
        if other.audit.quota_threshold.is_some() {
            base.audit.quota_threshold = other.audit.quota_threshold;
        }
        if other.audit.cooldown_minutes.is_some() {
            base.audit.cooldown_minutes = other.audit.cooldown_minutes;
        }
        if other.audit.utc_offset_hours.is_some() {
            base.audit.utc_offset_hours = other.audit.utc_offset_hours;
        }
        if other.audit.scope.is_some() {
            base.audit.scope = other.audit.scope;
        }

        // Verify
        if other.verify.api_base.is_some() {
            base.verify.api_base = other.verify.api_base.clone();
        }
        if other.verify.timeout_secs.is_some() {
            base.verify.timeout_secs = other.verify.timeout_secs;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `LIAISON_AUDIT_QUOTA_THRESHOLD`, `LIAISON_VERIFY_TIMEOUT_SECS`, etc.
    fn apply_env_overrides(config: &mut LiaisonConfig) {
        if let Ok(val) = std::env::var("LIAISON_AUDIT_QUOTA_THRESHOLD") {
            if let Ok(v) = val.parse::<u32>() {
                config.audit.quota_threshold = Some(v);
            }
        }
        if let Ok(val) = std::env::var("LIAISON_AUDIT_COOLDOWN_MINUTES") {
            if let Ok(v) = val.parse::<i64>() {
                config.audit.cooldown_minutes = Some(v);
            }
        }
        if let Ok(val) = std::env::var("LIAISON_AUDIT_UTC_OFFSET_HOURS") {
            if let Ok(v) = val.parse::<i32>() {
                config.audit.utc_offset_hours = Some(v);
            }
        }
        if let Ok(val) = std::env::var("LIAISON_AUDIT_SCOPE") {
            match val.as_str() {
                "owner" => config.audit.scope = Some(super::RuleScope::Owner),
                "global" => config.audit.scope = Some(super::RuleScope::Global),
                _ => {}
            }
        }
        if let Ok(val) = std::env::var("LIAISON_VERIFY_API_BASE") {
            config.verify.api_base = Some(val);
        }
        if let Ok(val) = std::env::var("LIAISON_VERIFY_TIMEOUT_SECS") {
            if let Ok(v) = val.parse::<u64>() {
                config.verify.timeout_secs = Some(v);
            }
        }
    }
}
