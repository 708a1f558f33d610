//! LLM generation profiles and the normalized response type

use serde::{Deserialize, Serialize};

/// Which of the two pipeline profiles a request uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    /// High temperature, short output; used for question generation
    Creative,
    /// Low temperature, long output; used for answer generation
    Accurate,
}

/// Sampling settings for one LLM call
///
/// Question generation and answer generation each use their own profile, and
/// the two must be kept apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationProfile {
    /// Profile identity
    pub kind: ProfileKind,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum number of tokens to generate
    pub max_tokens: u32,
}

impl GenerationProfile {
    /// Default creative profile (temperature 0.7, 1024 tokens)
    pub fn creative() -> Self {
        Self {
            kind: ProfileKind::Creative,
            temperature: 0.7,
            max_tokens: 1024,
        }
    }

    /// Default accurate profile (temperature 0.1, 2048 tokens)
    pub fn accurate() -> Self {
        Self {
            kind: ProfileKind::Accurate,
            temperature: 0.1,
            max_tokens: 2048,
        }
    }

    /// Validate sampling settings
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!(
                "temperature {} out of range [0.0, 2.0]",
                self.temperature
            ));
        }
        if self.max_tokens == 0 {
            return Err("max_tokens must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Normalized response from any LLM provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmResponse {
    /// Generated text
    pub text: String,

    /// Model that produced the text, when the provider reports it
    pub model: Option<String>,
}

impl LlmResponse {
    /// Response with text only
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            model: None,
        }
    }

    /// Attach the model name
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}
