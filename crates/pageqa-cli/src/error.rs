//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// LLM provider setup error
    #[error("LLM error: {0}")]
    Llm(#[from] pageqa_llm::LlmError),

    /// Vector store error
    #[error("Store error: {0}")]
    Store(#[from] pageqa_store::StoreError),

    /// Page extraction error
    #[error("Extraction error: {0}")]
    Extractor(#[from] pageqa_extractor::ExtractorError),

    /// Chunking or index build error
    #[error("Indexer error: {0}")]
    Indexer(#[from] pageqa_indexer::IndexerError),

    /// Stale table sweep error
    #[error("Janitor error: {0}")]
    Janitor(#[from] pageqa_janitor::JanitorError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Blocking task panicked or was cancelled
    #[error("Task join error: {0}")]
    Join(String),
}

impl From<tokio::task::JoinError> for CliError {
    fn from(e: tokio::task::JoinError) -> Self {
        CliError::Join(e.to_string())
    }
}
