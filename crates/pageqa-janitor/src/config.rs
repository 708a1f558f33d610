//! Configuration for Janitor operations
//!
//! Defines how old a renamed-aside table must be before it is swept, and how
//! often the background worker sweeps.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Janitor service
///
/// # Examples
///
/// ```
/// use pageqa_janitor::JanitorConfig;
///
/// // Default configuration (balanced)
/// let config = JanitorConfig::default();
/// assert_eq!(config.max_age_secs, 3600);
///
/// // Aggressive cleanup
/// let config = JanitorConfig::aggressive();
/// assert_eq!(config.max_age_secs, 300);
///
/// // Lenient cleanup
/// let config = JanitorConfig::lenient();
/// assert_eq!(config.max_age_secs, 86_400);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JanitorConfig {
    /// Minimum age of a stale table before it is removed (in seconds)
    /// Default: 3600 (one hour)
    pub max_age_secs: u64,

    /// How often the background worker sweeps (in minutes)
    /// Default: Every 60 minutes (hourly)
    pub sweep_interval_minutes: u64,

    /// Dry-run mode: Log what would be dropped without dropping it
    /// Default: false
    pub dry_run: bool,
}

impl Default for JanitorConfig {
    fn default() -> Self {
        Self {
            max_age_secs: 3600,
            sweep_interval_minutes: 60,
            dry_run: false,
        }
    }
}

impl JanitorConfig {
    /// Aggressive cleanup configuration (young tables swept, frequent sweeps)
    ///
    /// Suitable when disk space is tight.
    ///
    /// - Max age: 5 minutes
    /// - Sweep interval: 15 minutes
    pub fn aggressive() -> Self {
        Self {
            max_age_secs: 300,
            sweep_interval_minutes: 15,
            dry_run: false,
        }
    }

    /// Lenient cleanup configuration (tables kept a day, infrequent sweeps)
    ///
    /// Suitable for development, when stale tables are worth inspecting.
    ///
    /// - Max age: 24 hours
    /// - Sweep interval: 240 minutes
    pub fn lenient() -> Self {
        Self {
            max_age_secs: 86_400,
            sweep_interval_minutes: 240,
            dry_run: false,
        }
    }

    /// Get sweep interval as Duration
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_minutes.saturating_mul(60))
    }

    /// Get max age as Duration
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.sweep_interval_minutes == 0 {
            return Err("sweep_interval_minutes must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
