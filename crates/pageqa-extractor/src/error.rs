//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur during page extraction and question generation
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// LLM call exceeded the per-call timeout
    #[error("LLM call timed out after {0}ms")]
    Timeout(u64),

    /// Page text is below the minimum length and was not submitted
    #[error("Page {source_id}#p{page} too short: {chars} chars (min: {min})")]
    PageTooShort {
        /// Document identifier
        source_id: String,
        /// Page number
        page: u32,
        /// Trimmed character count
        chars: usize,
        /// Configured minimum
        min: usize,
    },

    /// Document could not be opened or read
    #[error("Document error ({source_id}): {reason}")]
    Document {
        /// Document identifier
        source_id: String,
        /// What went wrong
        reason: String,
    },

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Blocking task panicked or was cancelled
    #[error("Task join error: {0}")]
    Join(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<tokio::task::JoinError> for ExtractorError {
    fn from(e: tokio::task::JoinError) -> Self {
        ExtractorError::Join(e.to_string())
    }
}
