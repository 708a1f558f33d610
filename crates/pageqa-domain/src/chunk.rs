//! Chunks of page text and their embedded/retrieved forms

use crate::page::Provenance;
use serde::{Deserialize, Serialize};

/// A segment of page text sized for embedding
///
/// Provenance is inherited from the parent page, never re-derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Chunk text
    pub text: String,

    /// Document identifier
    pub source: String,

    /// 1-based page number
    pub page: u32,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(text: impl Into<String>, source: impl Into<String>, page: u32) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
            page,
        }
    }

    /// Metadata half of this chunk
    pub fn metadata(&self) -> ChunkMetadata {
        ChunkMetadata {
            source: self.source.clone(),
            page: self.page,
        }
    }

    /// The `(source, page)` pair of this chunk
    pub fn provenance(&self) -> Provenance {
        Provenance::new(self.source.clone(), self.page)
    }
}

/// Per-chunk metadata stored next to each vector
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Document identifier
    pub source: String,

    /// 1-based page number
    pub page: u32,
}

/// A chunk together with its embedding vector
///
/// Lives inside a vector table and is replaced wholesale on rebuild.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedChunk {
    /// The embedded chunk
    pub chunk: Chunk,

    /// Fixed-dimension embedding
    pub vector: Vec<f32>,
}

impl EmbeddedChunk {
    /// Pair a chunk with its embedding
    pub fn new(chunk: Chunk, vector: Vec<f32>) -> Self {
        Self { chunk, vector }
    }
}

/// A chunk returned by similarity search
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedChunk {
    /// The matching chunk
    pub chunk: Chunk,

    /// Cosine similarity to the query, higher is closer
    pub score: f32,
}
