//! Ollama Provider Implementation
//!
//! Provides integration with Ollama's generate and embed APIs.
//!
//! # Features
//!
//! - Blocking HTTP communication; callers run it on worker threads
//! - Sampling temperature and output length taken from the request profile
//! - Retry logic with exponential backoff for transport errors
//! - Timeout handling
//!
//! # Examples
//!
//! ```no_run
//! use pageqa_llm::OllamaProvider;
//! use pageqa_domain::GenerationProfile;
//! use pageqa_domain::traits::LlmProvider;
//!
//! let provider = OllamaProvider::new("http://localhost:11434", "llama3.1").unwrap();
//! let response = provider.invoke("Say hello", &GenerationProfile::creative()).unwrap();
//! println!("{}", response.text);
//! ```

use crate::{LlmConfig, LlmError};
use pageqa_domain::traits::{EmbeddingModel, LlmProvider as LlmProviderTrait};
use pageqa_domain::{GenerationProfile, LlmResponse};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default timeout for LLM requests (120 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default number of retry attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Ollama API provider for text generation
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    client: Client,
    max_retries: u32,
}

/// Request body for Ollama generate API
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

/// Response from Ollama generate API
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
    #[serde(default)]
    model: Option<String>,
}

fn build_client(timeout: Duration) -> Result<Client, LlmError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LlmError::Config(format!("Failed to build HTTP client: {}", e)))
}

/// Exponential backoff: 1s, 2s, 4s, etc.
fn backoff(attempt: u32) -> Duration {
    Duration::from_secs(2u64.pow(attempt.saturating_sub(1)))
}

/// POST `body` to `url` with retries, decoding a successful JSON reply
fn post_with_retries<B, R>(
    client: &Client,
    url: &str,
    body: &B,
    model: &str,
    max_retries: u32,
) -> Result<R, LlmError>
where
    B: Serialize,
    R: for<'de> Deserialize<'de>,
{
    let mut attempts = 0;
    let mut last_error = None;

    while attempts < max_retries {
        match client.post(url).json(body).send() {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    return response.json::<R>().map_err(|e| {
                        LlmError::InvalidResponse(format!("Failed to parse response: {}", e))
                    });
                } else if status == StatusCode::NOT_FOUND {
                    return Err(LlmError::ModelNotAvailable(model.to_string()));
                } else if status == StatusCode::TOO_MANY_REQUESTS {
                    last_error = Some(LlmError::RateLimitExceeded);
                } else {
                    let error_text = response
                        .text()
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    last_error = Some(LlmError::Communication(format!(
                        "HTTP {}: {}",
                        status, error_text
                    )));
                }
            }
            Err(e) => {
                last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
            }
        }

        attempts += 1;
        if attempts < max_retries {
            let delay = backoff(attempts);
            warn!(url, attempt = attempts, ?delay, "Request failed, retrying");
            thread::sleep(delay);
        }
    }

    Err(last_error
        .unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
}

impl OllamaProvider {
    /// Create a new Ollama provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Model to use (e.g., "llama3.1", "mistral")
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        Ok(Self {
            endpoint: endpoint.into(),
            model: model.into(),
            client: build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS))?,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Create a provider from configuration
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        Ok(Self {
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            client: build_client(config.request_timeout())?,
            max_retries: config.max_retries,
        })
    }

    /// Set the maximum number of retry attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Model name used for generation
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl LlmProviderTrait for OllamaProvider {
    type Error = LlmError;

    fn invoke(&self, prompt: &str, profile: &GenerationProfile) -> Result<LlmResponse, Self::Error> {
        let url = format!("{}/api/generate", self.endpoint.trim_end_matches('/'));
        let request_body = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: OllamaOptions {
                temperature: profile.temperature,
                num_predict: profile.max_tokens,
            },
        };

        debug!(model = %self.model, profile = ?profile.kind, prompt_len = prompt.len(), "Calling Ollama generate");

        let parsed: OllamaGenerateResponse =
            post_with_retries(&self.client, &url, &request_body, &self.model, self.max_retries)?;

        let model = parsed.model.unwrap_or_else(|| self.model.clone());
        Ok(LlmResponse::new(parsed.response).with_model(model))
    }
}

/// Ollama embed API client
pub struct OllamaEmbedder {
    endpoint: String,
    model: String,
    dimension: usize,
    client: Client,
    max_retries: u32,
}

#[derive(Serialize)]
struct OllamaEmbedRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Deserialize)]
struct OllamaEmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

impl OllamaEmbedder {
    /// Create a new embedder
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        dimension: usize,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            endpoint: endpoint.into(),
            model: model.into(),
            dimension,
            client: build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS))?,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Create an embedder from configuration
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        Ok(Self {
            endpoint: config.endpoint.clone(),
            model: config.embedding_model.clone(),
            dimension: config.embedding_dimension,
            client: build_client(config.request_timeout())?,
            max_retries: config.max_retries,
        })
    }

    /// Set the maximum number of retry attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

impl EmbeddingModel for OllamaEmbedder {
    type Error = LlmError;

    fn embed(&self, text: &str) -> Result<Vec<f32>, Self::Error> {
        self.embed_batch(&[text])?
            .pop()
            .ok_or_else(|| LlmError::InvalidResponse("No embedding returned".to_string()))
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, Self::Error> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/api/embed", self.endpoint.trim_end_matches('/'));
        let request_body = OllamaEmbedRequest {
            model: &self.model,
            input: texts,
        };

        let parsed: OllamaEmbedResponse =
            post_with_retries(&self.client, &url, &request_body, &self.model, self.max_retries)?;

        if parsed.embeddings.len() != texts.len() {
            return Err(LlmError::InvalidResponse(format!(
                "Ollama returned {} embeddings for {} inputs",
                parsed.embeddings.len(),
                texts.len()
            )));
        }
        if let Some(bad) = parsed.embeddings.iter().find(|v| v.len() != self.dimension) {
            return Err(LlmError::InvalidResponse(format!(
                "Embedding dimension {} does not match configured {}",
                bad.len(),
                self.dimension
            )));
        }

        Ok(parsed.embeddings)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
