//! Configuration for the LLM and embedding providers

use pageqa_domain::{GenerationProfile, ProfileKind};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Provider settings plus the two generation profiles
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Ollama API endpoint
    pub endpoint: String,

    /// Generation model name
    pub model: String,

    /// Embedding model name
    pub embedding_model: String,

    /// Dimension of vectors produced by the embedding model
    pub embedding_dimension: usize,

    /// HTTP timeout for a single request (seconds)
    pub request_timeout_secs: u64,

    /// Attempts per request for transport errors
    pub max_retries: u32,

    /// Profile used for question generation
    pub creative: GenerationProfile,

    /// Profile used for answer generation
    pub accurate: GenerationProfile,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: crate::ollama::DEFAULT_ENDPOINT.to_string(),
            model: "llama3.1".to_string(),
            embedding_model: "nomic-embed-text".to_string(),
            embedding_dimension: 768,
            request_timeout_secs: crate::ollama::DEFAULT_TIMEOUT_SECS,
            max_retries: crate::ollama::DEFAULT_MAX_RETRIES,
            creative: GenerationProfile::creative(),
            accurate: GenerationProfile::accurate(),
        }
    }
}

impl LlmConfig {
    /// Get the request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.endpoint.trim().is_empty() {
            return Err("endpoint must not be empty".to_string());
        }
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        if self.embedding_dimension == 0 {
            return Err("embedding_dimension must be greater than 0".to_string());
        }
        if self.max_retries == 0 {
            return Err("max_retries must be greater than 0".to_string());
        }
        if self.creative.kind != ProfileKind::Creative {
            return Err("creative profile must have kind 'creative'".to_string());
        }
        if self.accurate.kind != ProfileKind::Accurate {
            return Err("accurate profile must have kind 'accurate'".to_string());
        }
        self.creative.validate()?;
        self.accurate.validate()?;
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
        assert!(LlmConfig::default().validate().is_ok());
    }

    #[test]
    fn test_swapped_profiles_rejected() {
        let mut config = LlmConfig::default();
        std::mem::swap(&mut config.creative, &mut config.accurate);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = LlmConfig::from_toml("model = \"mistral\"").unwrap();
        assert_eq!(config.model, "mistral");
        assert_eq!(config.endpoint, crate::ollama::DEFAULT_ENDPOINT);
        assert_eq!(config.creative, GenerationProfile::creative());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = LlmConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = LlmConfig::from_toml(&toml_str).unwrap();

        assert_eq!(config.model, parsed.model);
        assert_eq!(config.accurate, parsed.accurate);
        assert_eq!(config.max_retries, parsed.max_retries);
    }
}
