//! Trait definitions for external capabilities
//!
//! These traits define the boundaries between pipeline logic and the external
//! model services. Implementations live in other crates (pageqa-llm,
//! pageqa-store) and tests substitute deterministic fakes.

use crate::profile::{GenerationProfile, LlmResponse};

/// Trait for LLM text generation
///
/// Implemented by the infrastructure layer (pageqa-llm). Calls block the
/// current thread for their full duration.
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate a completion for `prompt` using the sampling settings of `profile`
    fn invoke(&self, prompt: &str, profile: &GenerationProfile) -> Result<LlmResponse, Self::Error>;
}

/// Trait for text embedding models
///
/// Implemented by pageqa-store (mock) and pageqa-llm (HTTP).
pub trait EmbeddingModel {
    /// Error type for embedding operations
    type Error;

    /// Embed a single text into a fixed-dimension vector
    fn embed(&self, text: &str) -> Result<Vec<f32>, Self::Error>;

    /// Embed a batch of texts, one vector per input in input order
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, Self::Error> {
        texts.iter().map(|text| self.embed(text)).collect()
    }

    /// Dimension of the vectors this model produces
    fn dimension(&self) -> usize;
}
