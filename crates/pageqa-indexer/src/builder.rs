//! Idempotent vector index construction
//!
//! A build embeds chunks per document, tears down whatever table currently
//! holds the target name, writes a fresh table, and indexes it.
//!
//! # Teardown protocol
//!
//! 1. Drop the existing table, retrying with linear backoff
//! 2. If it cannot be dropped, rename it to `<name>__stale_<unix_millis>`,
//!    bumping the timestamp while that name is taken
//! 3. If it cannot be renamed either, fail with [`IndexerError::TableBlocked`]
//!
//! Renamed-aside tables are removed later by the janitor sweep.

use crate::config::IndexerConfig;
use crate::error::IndexerError;
use pageqa_domain::traits::EmbeddingModel;
use pageqa_domain::{Chunk, ChunkMetadata, EmbeddedChunk};
use pageqa_store::{now_millis, stale_table_name, StoreError, VectorStore};
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Stale names tried before a rename collision blocks the build
const RENAME_ATTEMPTS: u64 = 8;

/// Embedded chunks of one document, built in a single pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbeddedBatch {
    /// Chunk texts
    pub texts: Vec<String>,

    /// Provenance of each text
    pub metadatas: Vec<ChunkMetadata>,

    /// Embedding of each text
    pub vectors: Vec<Vec<f32>>,
}

impl EmbeddedBatch {
    /// Check that texts, metadatas and vectors line up
    pub fn validate(&self) -> Result<(), IndexerError> {
        if self.texts.len() != self.metadatas.len() || self.texts.len() != self.vectors.len() {
            return Err(IndexerError::BatchMismatch {
                texts: self.texts.len(),
                metadatas: self.metadatas.len(),
                vectors: self.vectors.len(),
            });
        }
        Ok(())
    }

    /// Number of rows in the batch
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    /// Whether the batch has no rows
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Rows in batch order
    pub fn into_rows(self) -> Vec<EmbeddedChunk> {
        self.texts
            .into_iter()
            .zip(self.metadatas)
            .zip(self.vectors)
            .map(|((text, meta), vector)| EmbeddedChunk::new(Chunk::new(text, meta.source, meta.page), vector))
            .collect()
    }
}

/// Result of a build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexHandle {
    /// Name of the table that now holds the rows
    pub table_name: String,

    /// Rows written
    pub rows: usize,

    /// Vector dimension
    pub dimension: usize,

    /// Whether a similarity index was built; searches scan linearly otherwise
    pub indexed: bool,
}

/// Builds the vector table for a set of chunks
pub struct IndexBuilder<S> {
    store: Arc<S>,
    config: IndexerConfig,
}

impl<S: VectorStore + 'static> IndexBuilder<S> {
    /// Create a builder over `store`
    pub fn new(store: Arc<S>, config: IndexerConfig) -> Self {
        Self { store, config }
    }

    /// Configuration in use
    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }

    /// Embed, write and index `chunks` into the configured table
    ///
    /// Running the same build twice leaves the same table contents as one run.
    pub async fn build<E>(&self, chunks: &[Chunk], embedder: Arc<E>) -> Result<IndexHandle, IndexerError>
    where
        E: EmbeddingModel + Send + Sync + 'static,
        E::Error: Display,
    {
        let name = self.config.table_name.clone();
        let dimension = embedder.dimension();
        if dimension == 0 {
            return Err(IndexerError::Config("embedding dimension is 0".to_string()));
        }

        let rows: Vec<EmbeddedChunk> = self
            .embed_documents(chunks, embedder)
            .await
            .into_iter()
            .flat_map(EmbeddedBatch::into_rows)
            .collect();

        info!(table = %name, chunks = chunks.len(), rows = rows.len(), "Building vector table");

        self.teardown(&name).await?;

        let row_count = rows.len();
        let table = name.clone();
        self.with_store(move |store| store.create_table(&table, dimension, &rows))
            .await?;

        let indexed = if row_count == 0 {
            debug!(table = %name, "Empty table is not indexed");
            false
        } else {
            self.build_index_with_retry(&name).await
        };

        info!(table = %name, rows = row_count, indexed, "Vector table ready");
        Ok(IndexHandle {
            table_name: name,
            rows: row_count,
            dimension,
            indexed,
        })
    }

    /// Embed chunks grouped by source document, one worker per document
    ///
    /// Batches come back in submission order (first-seen document order).
    /// A document whose embedding fails is dropped with a warning.
    pub async fn embed_documents<E>(&self, chunks: &[Chunk], embedder: Arc<E>) -> Vec<EmbeddedBatch>
    where
        E: EmbeddingModel + Send + Sync + 'static,
        E::Error: Display,
    {
        let groups = group_by_source(chunks);
        let permits = Arc::new(Semaphore::new(self.config.embed_workers.max(1)));
        let mut handles = Vec::with_capacity(groups.len());

        for (source, group) in groups {
            let Ok(permit) = Arc::clone(&permits).acquire_owned().await else {
                break;
            };
            let embedder = Arc::clone(&embedder);
            let handle = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                embed_group(embedder.as_ref(), group)
            });
            handles.push((source, handle));
        }

        let mut batches = Vec::with_capacity(handles.len());
        for (source, handle) in handles {
            match handle.await {
                Ok(Ok(batch)) => batches.push(batch),
                Ok(Err(e)) => warn!(source = %source, error = %e, "Dropping document from index"),
                Err(e) => warn!(source = %source, error = %e, "Embedding task failed"),
            }
        }
        batches
    }

    /// Remove whatever table currently holds `name`
    async fn teardown(&self, name: &str) -> Result<(), IndexerError> {
        let table = name.to_string();
        if !self.with_store(move |store| store.table_exists(&table)).await? {
            return Ok(());
        }

        let retries = self.config.delete_retries.max(1);
        let mut last_error = String::new();

        for attempt in 0..retries {
            let table = name.to_string();
            match self.with_store(move |store| store.drop_table(&table)).await {
                Ok(()) => {
                    debug!(table = name, attempt, "Dropped stale table");
                    return Ok(());
                }
                // Someone else removed it first
                Err(IndexerError::Store(StoreError::NotFound(_))) => return Ok(()),
                Err(e) => {
                    warn!(table = name, attempt = attempt + 1, retries, error = %e, "Failed to drop table");
                    last_error = e.to_string();
                    if attempt + 1 < retries {
                        sleep(self.config.delete_backoff(attempt)).await;
                    }
                }
            }
        }

        self.rename_aside(name, &last_error).await
    }

    /// Move `name` out of the way under a fresh stale name
    ///
    /// Stale names carry a millisecond timestamp; a name already taken is
    /// retried with the next millisecond.
    async fn rename_aside(&self, name: &str, drop_error: &str) -> Result<(), IndexerError> {
        let base = now_millis();
        let mut last_error = String::new();

        for offset in 0..RENAME_ATTEMPTS {
            let stale = stale_table_name(name, base + offset);
            let (from, to) = (name.to_string(), stale.clone());
            match self.with_store(move |store| store.rename_table(&from, &to)).await {
                Ok(()) => {
                    warn!(table = name, renamed_to = %stale, "Renamed undroppable table aside");
                    return Ok(());
                }
                Err(IndexerError::Store(StoreError::NotFound(_))) => return Ok(()),
                Err(IndexerError::Store(StoreError::TableExists(taken))) => {
                    debug!(table = name, taken = %taken, "Stale name already in use");
                    last_error = format!("{} already exists", taken);
                }
                Err(e) => {
                    last_error = e.to_string();
                    break;
                }
            }
        }

        Err(IndexerError::TableBlocked {
            name: name.to_string(),
            reason: format!("drop failed ({}), rename failed ({})", drop_error, last_error),
        })
    }

    async fn build_index_with_retry(&self, name: &str) -> bool {
        let retries = self.config.index_retries.max(1);

        for attempt in 0..retries {
            let table = name.to_string();
            let params = self.config.index.clone();
            match self.with_store(move |store| store.build_index(&table, &params)).await {
                Ok(()) => return true,
                Err(e) => {
                    warn!(table = name, attempt = attempt + 1, retries, error = %e, "Index build failed");
                    if attempt + 1 < retries {
                        sleep(self.config.index_backoff(attempt)).await;
                    }
                }
            }
        }

        warn!(table = name, "Giving up on index, searches will scan linearly");
        false
    }

    /// Run a store operation on a blocking worker thread
    async fn with_store<T, F>(&self, op: F) -> Result<T, IndexerError>
    where
        T: Send + 'static,
        F: FnOnce(&S) -> Result<T, StoreError> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let result = tokio::task::spawn_blocking(move || op(store.as_ref())).await?;
        Ok(result?)
    }
}

/// Group chunks by source, keeping first-seen document order
fn group_by_source(chunks: &[Chunk]) -> Vec<(String, Vec<Chunk>)> {
    let mut order: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<Chunk>)> = Vec::new();

    for chunk in chunks {
        let idx = *order.entry(chunk.source.as_str()).or_insert_with(|| {
            groups.push((chunk.source.clone(), Vec::new()));
            groups.len() - 1
        });
        groups[idx].1.push(chunk.clone());
    }
    groups
}

fn embed_group<E>(embedder: &E, group: Vec<Chunk>) -> Result<EmbeddedBatch, IndexerError>
where
    E: EmbeddingModel,
    E::Error: Display,
{
    let texts: Vec<&str> = group.iter().map(|chunk| chunk.text.as_str()).collect();
    let vectors = embedder
        .embed_batch(&texts)
        .map_err(|e| IndexerError::Embedding(e.to_string()))?;

    let dimension = embedder.dimension();
    if let Some(bad) = vectors.iter().find(|v| v.len() != dimension) {
        return Err(IndexerError::Embedding(format!(
            "expected {}-dimensional vectors, got {}",
            dimension,
            bad.len()
        )));
    }

    let batch = EmbeddedBatch {
        metadatas: group.iter().map(Chunk::metadata).collect(),
        texts: group.into_iter().map(|chunk| chunk.text).collect(),
        vectors,
    };
    batch.validate()?;
    Ok(batch)
}
