//! PageQA Storage Layer
//!
//! Persistent vector tables on SQLite with an in-memory HNSW index per table.
//!
//! # Architecture
//!
//! - SQLite holds a catalog of named vector tables and their rows
//!   (chunk text, provenance, embedding)
//! - HNSW provides approximate nearest-neighbor search over a table's rows
//! - A table without an index is still searchable by linear scan
//! - Stale tables renamed aside during a rebuild carry a timestamp suffix
//!   (see [`stale_table_name`]) so a sweep can find and remove them later
//!
//! # Examples
//!
//! ```no_run
//! use pageqa_store::{SqliteVectorStore, VectorStore};
//!
//! let store = SqliteVectorStore::connect(":memory:").unwrap();
//! store.create_table("pages", 384, &[]).unwrap();
//! assert_eq!(store.row_count("pages").unwrap(), 0);
//! ```

#![warn(missing_docs)]

pub mod embedding;
mod sqlite;
pub mod vector_index;

use pageqa_domain::{EmbeddedChunk, RetrievedChunk};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

pub use embedding::{cosine_similarity, EmbeddingError, MockEmbeddingModel};
pub use sqlite::SqliteVectorStore;
pub use vector_index::{VectorIndex, VectorIndexError};

/// Separator between a table name and the timestamp of a renamed-aside copy
pub const STALE_MARKER: &str = "__stale_";

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Table not found
    #[error("Table not found: {0}")]
    NotFound(String),

    /// Table name already taken
    #[error("Table already exists: {0}")]
    TableExists(String),

    /// Vector dimension does not match the table
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension of the table
        expected: usize,
        /// Dimension provided
        actual: usize,
    },

    /// Table has no rows to index
    #[error("Table is empty: {0}")]
    EmptyTable(String),

    /// Index construction error
    #[error("Index error: {0}")]
    Index(#[from] VectorIndexError),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A shared lock was poisoned by a panicking thread
    #[error("Lock poisoned: {0}")]
    Lock(String),
}

/// Similarity metric used by the index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// Cosine distance (1 - cosine similarity)
    #[default]
    Cosine,
}

/// Parameters for building a similarity index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexParams {
    /// Similarity metric
    pub metric: DistanceMetric,

    /// HNSW links per node (M)
    pub max_connections: usize,

    /// Candidate list size during construction
    pub ef_construction: usize,

    /// Candidate list size during search
    pub ef_search: usize,
}

impl Default for IndexParams {
    fn default() -> Self {
        Self {
            metric: DistanceMetric::Cosine,
            max_connections: 16,
            ef_construction: 200,
            ef_search: 64,
        }
    }
}

impl IndexParams {
    /// Validate the parameters
    pub fn validate(&self) -> Result<(), String> {
        if self.max_connections == 0 {
            return Err("max_connections must be greater than 0".to_string());
        }
        if self.ef_construction == 0 {
            return Err("ef_construction must be greater than 0".to_string());
        }
        if self.ef_search == 0 {
            return Err("ef_search must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Catalog entry for one vector table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    /// Table name
    pub name: String,

    /// Vector dimension
    pub dimension: usize,

    /// Creation time in milliseconds since Unix epoch
    pub created_at_ms: u64,

    /// Number of rows
    pub rows: usize,
}

/// Trait for persistent vector tables keyed by name
///
/// Implementations must be shareable across worker threads. Concurrent
/// writers against the same table name are not supported.
pub trait VectorStore: Send + Sync {
    /// Create a table and write `rows` in order; fails if the name is taken
    fn create_table(&self, name: &str, dimension: usize, rows: &[EmbeddedChunk]) -> Result<(), StoreError>;

    /// Delete a table, its rows and its index
    fn drop_table(&self, name: &str) -> Result<(), StoreError>;

    /// Rename a table; any index on it is discarded
    fn rename_table(&self, from: &str, to: &str) -> Result<(), StoreError>;

    /// Whether a table with this name exists
    fn table_exists(&self, name: &str) -> Result<bool, StoreError>;

    /// All tables in the catalog
    fn list_tables(&self) -> Result<Vec<TableInfo>, StoreError>;

    /// Number of rows in a table
    fn row_count(&self, name: &str) -> Result<usize, StoreError>;

    /// Build (or rebuild) the similarity index of a table
    fn build_index(&self, name: &str, params: &IndexParams) -> Result<(), StoreError>;

    /// Whether the table currently has a similarity index
    fn has_index(&self, name: &str) -> bool;

    /// Top-`k` rows most similar to `query`, highest similarity first
    fn search(&self, name: &str, query: &[f32], k: usize) -> Result<Vec<RetrievedChunk>, StoreError>;
}

/// Current time in milliseconds since Unix epoch
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Name for a stale copy of `name` renamed aside at `timestamp_ms`
pub fn stale_table_name(name: &str, timestamp_ms: u64) -> String {
    format!("{}{}{}", name, STALE_MARKER, timestamp_ms)
}

/// Split a stale table name into its base name and timestamp
///
/// Returns `None` for names that were not produced by [`stale_table_name`].
pub fn parse_stale_table_name(name: &str) -> Option<(&str, u64)> {
    let idx = name.rfind(STALE_MARKER)?;
    let base = &name[..idx];
    let digits = &name[idx + STALE_MARKER.len()..];
    if base.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().map(|ts| (base, ts))
}
