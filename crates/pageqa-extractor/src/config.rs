//! Configuration for page extraction and question generation

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Extractor and its batch runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Minimum trimmed page length (characters) for a page to be kept
    pub min_page_chars: usize,

    /// Length of the page preview stored on each question (characters)
    pub context_preview_chars: usize,

    /// Maximum questions kept per page
    pub max_questions_per_page: usize,

    /// Width of the document pool and of each page pool
    pub max_workers: usize,

    /// Fixed pause after every LLM call (milliseconds)
    pub call_delay_ms: u64,

    /// Maximum time for a single LLM call (seconds)
    pub call_timeout_secs: u64,

    /// Per-call timeout in milliseconds; overrides `call_timeout_secs` when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_timeout_ms: Option<u64>,

    /// Back-to-back failed documents that stop further dispatch
    pub max_consecutive_failures: usize,
}

impl ExtractorConfig {
    /// Get the per-call timeout as a Duration
    pub fn call_timeout(&self) -> Duration {
        match self.call_timeout_ms {
            Some(ms) => Duration::from_millis(ms),
            None => Duration::from_secs(self.call_timeout_secs),
        }
    }

    /// Get the per-call delay as a Duration
    pub fn call_delay(&self) -> Duration {
        Duration::from_millis(self.call_delay_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.context_preview_chars == 0 {
            return Err("context_preview_chars must be greater than 0".to_string());
        }
        if self.max_questions_per_page == 0 {
            return Err("max_questions_per_page must be greater than 0".to_string());
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
        if self.max_consecutive_failures == 0 {
            return Err("max_consecutive_failures must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    /// Default configuration with balanced settings
    fn default() -> Self {
        Self {
            min_page_chars: 200,
            context_preview_chars: 500,
            max_questions_per_page: 5,
            max_workers: 4,
            call_delay_ms: 1000,
            call_timeout_secs: 120,
            call_timeout_ms: None,
            max_consecutive_failures: 5,
        }
    }
}

impl ExtractorConfig {
    /// Aggressive preset: wider pools, short delay, quick abort
    pub fn aggressive() -> Self {
        Self {
            max_workers: 8,
            call_delay_ms: 250,
            call_timeout_secs: 60,
            max_consecutive_failures: 3,
            ..Self::default()
        }
    }

    /// Lenient preset: narrow pools, gentle pacing, tolerant of failures
    pub fn lenient() -> Self {
        Self {
            max_workers: 2,
            call_delay_ms: 2000,
            call_timeout_secs: 300,
            max_consecutive_failures: 10,
            ..Self::default()
        }
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
