//! Top-k retrieval over a built vector table

use crate::builder::IndexHandle;
use crate::error::IndexerError;
use pageqa_domain::traits::EmbeddingModel;
use pageqa_domain::RetrievedChunk;
use pageqa_store::VectorStore;
use std::fmt::Display;
use std::sync::Arc;
use tracing::debug;

/// Answers similarity queries against one vector table
///
/// Calls are synchronous; async callers should run them on a blocking thread.
pub struct Retriever<S, E> {
    store: Arc<S>,
    embedder: Arc<E>,
    table_name: String,
}

impl<S, E> Clone for Retriever<S, E> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            embedder: Arc::clone(&self.embedder),
            table_name: self.table_name.clone(),
        }
    }
}

impl<S, E> Retriever<S, E>
where
    S: VectorStore,
    E: EmbeddingModel,
    E::Error: Display,
{
    /// Create a retriever over `table_name`
    pub fn new(store: Arc<S>, embedder: Arc<E>, table_name: impl Into<String>) -> Self {
        Self {
            store,
            embedder,
            table_name: table_name.into(),
        }
    }

    /// Create a retriever over the table a build just produced
    pub fn from_handle(store: Arc<S>, embedder: Arc<E>, handle: &IndexHandle) -> Self {
        Self::new(store, embedder, handle.table_name.clone())
    }

    /// Table this retriever reads
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// At most `k` chunks most similar to `query`, closest first
    ///
    /// An empty table yields no chunks. Fails with
    /// [`IndexerError::InvalidTopK`] when `k == 0`.
    pub fn retrieve(&self, query: &str, k: usize) -> Result<Vec<RetrievedChunk>, IndexerError> {
        if k == 0 {
            return Err(IndexerError::InvalidTopK);
        }
        if self.store.row_count(&self.table_name)? == 0 {
            debug!(table = %self.table_name, "Retrieval against empty table");
            return Ok(Vec::new());
        }

        let vector = self
            .embedder
            .embed(query)
            .map_err(|e| IndexerError::Embedding(e.to_string()))?;
        Ok(self.store.search(&self.table_name, &vector, k)?)
    }
}
