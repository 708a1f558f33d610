//! Error types for the Synthesizer

use thiserror::Error;

/// Errors that can occur while answering one question
#[derive(Error, Debug)]
pub enum SynthesizerError {
    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// The LLM call exceeded the per-call timeout
    #[error("LLM call timed out after {0}ms")]
    Timeout(u64),

    /// Retrieval of grounding context failed
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// The model returned no answer text
    #[error("Empty answer")]
    EmptyAnswer,

    /// Structured output without a usable `answer` field
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Blocking task panicked or was cancelled
    #[error("Task join error: {0}")]
    Join(String),
}

impl From<tokio::task::JoinError> for SynthesizerError {
    fn from(e: tokio::task::JoinError) -> Self {
        SynthesizerError::Join(e.to_string())
    }
}

impl From<pageqa_indexer::IndexerError> for SynthesizerError {
    fn from(e: pageqa_indexer::IndexerError) -> Self {
        SynthesizerError::Retrieval(e.to_string())
    }
}
