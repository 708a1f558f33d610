//! Embedding Model for Text Vectorization
//!
//! This module provides a deterministic, dependency-free embedding model for
//! tests and offline runs, plus the cosine similarity used across the store.
//!
//! # Architecture
//!
//! - **MockEmbeddingModel**: Feature-hashed bag-of-words embeddings
//! - Real models (e.g. `OllamaEmbedder` in pageqa-llm) implement the same
//!   `EmbeddingModel` trait from pageqa-domain
//!
//! # Examples
//!
//! ```rust
//! use pageqa_store::embedding::MockEmbeddingModel;
//! use pageqa_domain::traits::EmbeddingModel;
//!
//! let model = MockEmbeddingModel::new(384);
//! let text = "The sky is blue";
//! let embedding = model.embed(text).unwrap();
//! assert_eq!(embedding.len(), 384);
//!
//! // Same text always produces same embedding
//! let embedding2 = model.embed(text).unwrap();
//! assert_eq!(embedding, embedding2);
//! ```

use pageqa_domain::traits::EmbeddingModel;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Errors that can occur during embedding generation
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// Invalid input text
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Model inference error
    #[error("Model inference failed: {0}")]
    InferenceFailed(String),
}

/// Mock embedding model based on feature hashing
///
/// Each lowercase word is hashed into one of `dimension` buckets with a
/// hash-derived sign, and the result is normalized to unit length. The
/// embeddings are:
///
/// - **Deterministic**: Same text always produces same embedding
/// - **Normalized**: All vectors have unit length (for cosine similarity)
/// - **Lexical**: Texts sharing words are closer than texts that share none
#[derive(Debug, Clone)]
pub struct MockEmbeddingModel {
    dimension: usize,
}

impl MockEmbeddingModel {
    /// Create a new mock embedding model
    ///
    /// # Parameters
    ///
    /// - `dimension`: The embedding dimension (e.g., 384)
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn hash_token(token: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        token.hash(&mut hasher);
        hasher.finish()
    }
}

impl EmbeddingModel for MockEmbeddingModel {
    type Error = EmbeddingError;

    fn embed(&self, text: &str) -> Result<Vec<f32>, Self::Error> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(EmbeddingError::InvalidInput(
                "Empty text cannot be embedded".to_string(),
            ));
        }
        if self.dimension == 0 {
            return Err(EmbeddingError::InvalidInput(
                "Embedding dimension is zero".to_string(),
            ));
        }

        let mut tokens: Vec<String> = trimmed
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_lowercase())
            .collect();
        // Punctuation-only text still gets a stable vector
        if tokens.is_empty() {
            tokens.push(trimmed.to_string());
        }

        let mut embedding = vec![0.0f32; self.dimension];
        for token in &tokens {
            let hash = Self::hash_token(token);
            let bucket = (hash % self.dimension as u64) as usize;
            let sign = if hash >> 63 == 1 { -1.0 } else { 1.0 };
            embedding[bucket] += sign;
        }

        // Normalize to unit length for cosine similarity
        let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for value in &mut embedding {
                *value /= magnitude;
            }
        }

        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Calculate cosine similarity between two embedding vectors
///
/// Returns a value in range [-1, 1]. Vectors of different lengths or with
/// zero magnitude have similarity 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    dot_product / (magnitude_a * magnitude_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_embedding_deterministic() {
        let model = MockEmbeddingModel::new(384);

        let text = "The quick brown fox jumps over the lazy dog";
        let embedding1 = model.embed(text).unwrap();
        let embedding2 = model.embed(text).unwrap();

        assert_eq!(embedding1, embedding2, "Same text should produce same embedding");
    }

    #[test]
    fn test_mock_embedding_dimension() {
        let model = MockEmbeddingModel::new(128);

        let embedding = model.embed("test").unwrap();
        assert_eq!(embedding.len(), 128);
        assert_eq!(model.dimension(), 128);
    }

    #[test]
    fn test_mock_embedding_normalized() {
        let model = MockEmbeddingModel::new(384);

        let embedding = model.embed("test text").unwrap();

        let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((magnitude - 1.0).abs() < 0.0001, "Embedding should be normalized");
    }

    #[test]
    fn test_shared_words_are_closer() {
        let model = MockEmbeddingModel::new(384);

        let base = model.embed("The cat sat on the mat").unwrap();
        let related = model.embed("the cat sat on a mat").unwrap();
        let unrelated = model.embed("Quantum chromodynamics lecture notes").unwrap();

        assert!(cosine_similarity(&base, &related) > cosine_similarity(&base, &unrelated));
    }

    #[test]
    fn test_case_and_punctuation_insensitive() {
        let model = MockEmbeddingModel::new(64);
        assert_eq!(model.embed("Hello, World!").unwrap(), model.embed("hello world").unwrap());
    }

    #[test]
    fn test_punctuation_only_text() {
        let model = MockEmbeddingModel::new(64);
        let embedding = model.embed("...").unwrap();
        assert_eq!(embedding.len(), 64);
    }

    #[test]
    fn test_mock_embedding_empty_text() {
        let model = MockEmbeddingModel::new(384);

        let result = model.embed("   ");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Empty text"));
    }

    #[test]
    fn test_embed_batch_preserves_order() {
        let model = MockEmbeddingModel::new(32);
        let batch = model.embed_batch(&["one", "two"]).unwrap();
        assert_eq!(batch[0], model.embed("one").unwrap());
        assert_eq!(batch[1], model.embed("two").unwrap());
    }

    #[test]
    fn test_cosine_similarity_identical() {
        let vec = vec![1.0, 0.0, 0.0];
        let similarity = cosine_similarity(&vec, &vec);
        assert!((similarity - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let vec1 = vec![1.0, 0.0, 0.0];
        let vec2 = vec![0.0, 1.0, 0.0];
        let similarity = cosine_similarity(&vec1, &vec2);
        assert!(similarity.abs() < 0.0001);
    }

    #[test]
    fn test_cosine_similarity_opposite() {
        let vec1 = vec![1.0, 0.0, 0.0];
        let vec2 = vec![-1.0, 0.0, 0.0];
        let similarity = cosine_similarity(&vec1, &vec2);
        assert!((similarity + 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_cosine_similarity_length_mismatch() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0]), 0.0);
    }
}
