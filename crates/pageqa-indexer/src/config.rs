//! Configuration for chunking and index building

use pageqa_store::IndexParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Chunk sizing, in characters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkerConfig {
    /// Target maximum chunk length
    pub chunk_size: usize,

    /// Trailing characters carried into the next chunk
    pub chunk_overlap: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

impl ChunkerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("chunk_size must be greater than 0".to_string());
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            ));
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

/// Configuration for the Vector Index Builder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexerConfig {
    /// Name of the vector table to (re)build
    pub table_name: String,

    /// Documents embedded concurrently
    pub embed_workers: usize,

    /// Attempts to drop a stale table before renaming it aside
    pub delete_retries: u32,

    /// Linear backoff between drop attempts (milliseconds)
    pub delete_backoff_ms: u64,

    /// Attempts to build the similarity index
    pub index_retries: u32,

    /// Base of the exponential backoff between index attempts (milliseconds)
    pub index_backoff_ms: u64,

    /// Similarity index parameters
    pub index: IndexParams,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            table_name: "pdf_pages".to_string(),
            embed_workers: 4,
            delete_retries: 3,
            delete_backoff_ms: 100,
            index_retries: 3,
            index_backoff_ms: 500,
            index: IndexParams::default(),
        }
    }
}

impl IndexerConfig {
    /// Pause before drop attempt `attempt + 1`
    pub fn delete_backoff(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.delete_backoff_ms.saturating_mul(u64::from(attempt) + 1))
    }

    /// Pause before index attempt `attempt + 1`
    pub fn index_backoff(&self, attempt: u32) -> Duration {
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        Duration::from_millis(self.index_backoff_ms.saturating_mul(factor))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.table_name.trim().is_empty() {
            return Err("table_name must not be empty".to_string());
        }
        if self.table_name.contains(pageqa_store::STALE_MARKER) {
            return Err(format!(
                "table_name must not contain '{}'",
                pageqa_store::STALE_MARKER
            ));
        }
        if self.embed_workers == 0 {
            return Err("embed_workers must be greater than 0".to_string());
        }
        if self.delete_retries == 0 {
            return Err("delete_retries must be greater than 0".to_string());
        }
        if self.index_retries == 0 {
            return Err("index_retries must be greater than 0".to_string());
        }
        self.index.validate()
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
