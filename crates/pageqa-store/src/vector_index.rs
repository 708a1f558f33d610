//! HNSW Vector Index for Semantic Search
//!
//! This module provides a wrapper around the HNSW algorithm for efficient
//! nearest-neighbor search over the rows of one vector table.
//!
//! # Architecture
//!
//! - In-memory index, built from a table's persisted rows
//! - Internal HNSW ids are the table's row positions
//! - Rebuilt wholesale, never patched
//!
//! # HNSW Parameters
//!
//! - **M** (`max_connections`): Number of bi-directional links per node (default: 16)
//!   Higher M = better accuracy but more memory
//! - **efConstruction**: Size of dynamic candidate list during construction (default: 200)
//!   Higher efConstruction = better index quality but slower build
//! - **efSearch**: Size of dynamic candidate list during search (default: 64)
//!   Higher efSearch = better recall but slower queries

use crate::IndexParams;
use hnsw_rs::prelude::*;
use thiserror::Error;

/// Upper bound on HNSW layers supported by hnsw_rs
const MAX_LAYERS: usize = 16;

/// Errors that can occur during vector index operations
#[derive(Error, Debug)]
pub enum VectorIndexError {
    /// Invalid embedding dimension
    #[error("Invalid embedding dimension: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension provided
        actual: usize,
    },

    /// Invalid index parameters
    #[error("Invalid index parameters: {0}")]
    InvalidParams(String),
}

/// A wrapper around HNSW for vector similarity search
///
/// This index stores (position, embedding) pairs and returns positions
/// ranked by cosine similarity.
///
/// # Examples
///
/// ```no_run
/// use pageqa_store::vector_index::VectorIndex;
/// use pageqa_store::IndexParams;
///
/// let mut index = VectorIndex::new(384, 10, &IndexParams::default()).unwrap();
/// let embedding = vec![0.1; 384];
/// index.add(0, &embedding).unwrap();
///
/// let results = index.search(&embedding, 5).unwrap();
/// ```
pub struct VectorIndex {
    /// Expected embedding dimension
    dimension: usize,

    /// Search quality parameter
    ef_search: usize,

    /// HNSW index; hnsw_rs owns a copy of every inserted vector
    hnsw: Hnsw<'static, f32, DistCosine>,

    /// Number of inserted vectors
    len: usize,
}

impl VectorIndex {
    /// Create an empty index sized for `capacity` vectors
    pub fn new(dimension: usize, capacity: usize, params: &IndexParams) -> Result<Self, VectorIndexError> {
        params.validate().map_err(VectorIndexError::InvalidParams)?;
        if dimension == 0 {
            return Err(VectorIndexError::InvalidParams(
                "dimension must be greater than 0".to_string(),
            ));
        }

        let max_elements = capacity.max(1);
        // Calculate number of layers based on expected data size
        let nb_layer = MAX_LAYERS.min((max_elements as f32).ln().trunc() as usize).max(1);

        let hnsw = Hnsw::<'static, f32, DistCosine>::new(
            params.max_connections,
            max_elements,
            nb_layer,
            params.ef_construction,
            DistCosine {},
        );

        Ok(Self {
            dimension,
            ef_search: params.ef_search,
            hnsw,
            len: 0,
        })
    }

    /// Add an embedding under the given row position
    pub fn add(&mut self, position: usize, embedding: &[f32]) -> Result<(), VectorIndexError> {
        if embedding.len() != self.dimension {
            return Err(VectorIndexError::DimensionMismatch {
                expected: self.dimension,
                actual: embedding.len(),
            });
        }

        self.hnsw.insert((embedding, position));
        self.len += 1;

        Ok(())
    }

    /// Search for the k nearest neighbors to the given embedding
    ///
    /// Returns (position, similarity) pairs sorted by similarity (descending).
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>, VectorIndexError> {
        if query.len() != self.dimension {
            return Err(VectorIndexError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }
        if k == 0 || self.len == 0 {
            return Ok(Vec::new());
        }

        let ef = self.ef_search.max(k);
        let mut results: Vec<(usize, f32)> = self
            .hnsw
            .search(query, k, ef)
            .into_iter()
            // HNSW returns cosine distance, we want similarity (1 - distance)
            .map(|neighbour| (neighbour.d_id, 1.0 - neighbour.distance))
            .collect();

        results.sort_by(|a, b| b.1.total_cmp(&a.1));
        results.truncate(k);
        Ok(results)
    }

    /// Get the number of vectors in the index
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Search quality parameter this index was built with
    pub fn ef_search(&self) -> usize {
        self.ef_search
    }
}
