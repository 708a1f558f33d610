//! Error types for the Indexer

use pageqa_store::StoreError;
use thiserror::Error;

/// Errors that can occur while chunking, indexing or retrieving
#[derive(Error, Debug)]
pub enum IndexerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Vector store error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Embedding model error
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// An embedded batch whose parts disagree in length
    #[error("Batch mismatch: {texts} texts, {metadatas} metadatas, {vectors} vectors")]
    BatchMismatch {
        /// Number of texts
        texts: usize,
        /// Number of metadata entries
        metadatas: usize,
        /// Number of vectors
        vectors: usize,
    },

    /// The stale table could be neither dropped nor renamed aside
    #[error("Table {name} is blocked: {reason}")]
    TableBlocked {
        /// Table name
        name: String,
        /// Last teardown error
        reason: String,
    },

    /// Retrieval asked for zero results
    #[error("top_k must be greater than 0")]
    InvalidTopK,

    /// Blocking task panicked or was cancelled
    #[error("Task join error: {0}")]
    Join(String),
}

impl From<tokio::task::JoinError> for IndexerError {
    fn from(e: tokio::task::JoinError) -> Self {
        IndexerError::Join(e.to_string())
    }
}
