//! Configuration for answer synthesis

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Answer Generator and its batch runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesizerConfig {
    /// Chunks retrieved as grounding context per question
    pub top_k: usize,

    /// Questions answered concurrently
    pub max_workers: usize,

    /// Fixed pause after every LLM call (milliseconds)
    pub call_delay_ms: u64,

    /// Upper bound on a single LLM call (seconds)
    pub call_timeout_secs: u64,

    /// Per-call timeout in milliseconds; overrides `call_timeout_secs` when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_timeout_ms: Option<u64>,
}

impl Default for SynthesizerConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            max_workers: 4,
            call_delay_ms: 1000,
            call_timeout_secs: 120,
            call_timeout_ms: None,
        }
    }
}

impl SynthesizerConfig {
    /// Per-call timeout as a `Duration`
    pub fn call_timeout(&self) -> Duration {
        match self.call_timeout_ms {
            Some(ms) => Duration::from_millis(ms),
            None => Duration::from_secs(self.call_timeout_secs),
        }
    }

    /// Per-call delay as a `Duration`
    pub fn call_delay(&self) -> Duration {
        Duration::from_millis(self.call_delay_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.top_k == 0 {
            return Err("top_k must be greater than 0".to_string());
        }
        if self.max_workers == 0 {
            return Err("max_workers must be greater than 0".to_string());
        }
        if self.call_timeout_secs == 0 {
            return Err("call_timeout_secs must be greater than 0".to_string());
        }
        if self.call_timeout_ms == Some(0) {
            return Err("call_timeout_ms must be greater than 0".to_string());
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SynthesizerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.top_k, 3);
    }

    #[test]
    fn test_zero_top_k_is_invalid() {
        let config = SynthesizerConfig {
            top_k: 0,
            ..SynthesizerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = SynthesizerConfig::from_toml("top_k = 5").unwrap();
        assert_eq!(config.top_k, 5);
        assert_eq!(config.max_workers, 4);
        assert_eq!(config.call_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_millisecond_timeout_overrides_seconds() {
        let config = SynthesizerConfig::from_toml("call_timeout_secs = 30\ncall_timeout_ms = 250").unwrap();
        assert_eq!(config.call_timeout(), Duration::from_millis(250));
        assert!(config.validate().is_ok());

        let zero = SynthesizerConfig {
            call_timeout_ms: Some(0),
            ..SynthesizerConfig::default()
        };
        assert!(zero.validate().is_err());
    }
}
