//! PageQA LLM Provider Layer
//!
//! Pluggable LLM and embedding provider implementations.
//!
//! # Architecture
//!
//! This crate provides implementations of the `LlmProvider` and
//! `EmbeddingModel` traits from `pageqa-domain`, plus the single response
//! parser shared by the question and answer stages.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `SlowProvider`: Mock that blocks for a fixed time and counts overlapping calls
//! - `OllamaProvider`: Ollama generate API integration
//! - `OllamaEmbedder`: Ollama embed API integration
//!
//! # Examples
//!
//! ```
//! use pageqa_llm::MockProvider;
//! use pageqa_domain::GenerationProfile;
//! use pageqa_domain::traits::LlmProvider;
//!
//! let provider = MockProvider::new("Hello from LLM!");
//! let result = provider.invoke("test prompt", &GenerationProfile::creative()).unwrap();
//! assert_eq!(result.text, "Hello from LLM!");
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod ollama;
pub mod response;

use pageqa_domain::traits::LlmProvider as LlmProviderTrait;
use pageqa_domain::{GenerationProfile, LlmResponse, ProfileKind};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

pub use config::LlmConfig;
pub use ollama::{OllamaEmbedder, OllamaProvider};
pub use response::{extract_fenced_block, looks_like_json, parse_json_value};

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Mock LLM provider for deterministic testing
///
/// This provider returns pre-configured responses without making any network calls.
/// Responses are matched in order: exact prompt, then the first registered
/// substring contained in the prompt, then the default response.
///
/// # Examples
///
/// ```
/// use pageqa_llm::MockProvider;
/// use pageqa_domain::GenerationProfile;
/// use pageqa_domain::traits::LlmProvider;
///
/// let profile = GenerationProfile::creative();
///
/// // Simple fixed response
/// let provider = MockProvider::new("Fixed response");
/// assert_eq!(provider.invoke("any prompt", &profile).unwrap().text, "Fixed response");
///
/// // Multiple responses
/// let mut provider = MockProvider::default();
/// provider.add_response("prompt1", "response1");
/// provider.add_response_containing("needle", "response2");
/// assert_eq!(provider.invoke("prompt1", &profile).unwrap().text, "response1");
/// assert_eq!(provider.invoke("a needle here", &profile).unwrap().text, "response2");
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, String>>>,
    contains_responses: Arc<Mutex<Vec<(String, String)>>>,
    call_count: Arc<Mutex<usize>>,
    profiles: Arc<Mutex<Vec<ProfileKind>>>,
}

const MOCK_ERROR: &str = "ERROR";

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            contains_responses: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
            profiles: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(prompt.into(), response.into());
    }

    /// Add a response returned for any prompt containing `needle`
    pub fn add_response_containing(&mut self, needle: impl Into<String>, response: impl Into<String>) {
        self.contains_responses
            .lock()
            .unwrap()
            .push((needle.into(), response.into()));
    }

    /// Configure to return an error for a specific prompt
    pub fn add_error(&mut self, prompt: impl Into<String>) {
        self.add_response(prompt, MOCK_ERROR);
    }

    /// Configure to return an error for any prompt containing `needle`
    pub fn add_error_containing(&mut self, needle: impl Into<String>) {
        self.add_response_containing(needle, MOCK_ERROR);
    }

    /// Get the number of times invoke was called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        *self.call_count.lock().unwrap() = 0;
    }

    /// Profiles of every call so far, in call order
    pub fn recorded_profiles(&self) -> Vec<ProfileKind> {
        self.profiles.lock().unwrap().clone()
    }

    fn lookup(&self, prompt: &str) -> String {
        if let Some(response) = self.responses.lock().unwrap().get(prompt) {
            return response.clone();
        }
        let contains = self.contains_responses.lock().unwrap();
        if let Some((_, response)) = contains.iter().find(|(needle, _)| prompt.contains(needle.as_str())) {
            return response.clone();
        }
        self.default_response.clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn invoke(&self, prompt: &str, profile: &GenerationProfile) -> Result<LlmResponse, Self::Error> {
        *self.call_count.lock().unwrap() += 1;
        self.profiles.lock().unwrap().push(profile.kind);

        let response = self.lookup(prompt);
        if response == MOCK_ERROR {
            return Err(LlmError::Other("Mock error".to_string()));
        }
        Ok(LlmResponse::new(response).with_model("mock"))
    }
}

/// Mock provider that blocks each call for a fixed duration
///
/// Tracks how many calls overlap so tests can check concurrency limits and
/// timeout handling against a provider that outlives its deadline.
#[derive(Debug, Clone)]
pub struct SlowProvider {
    inner: MockProvider,
    delay: Duration,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl SlowProvider {
    /// Respond with `response` after blocking for `delay`
    pub fn new(response: impl Into<String>, delay: Duration) -> Self {
        Self {
            inner: MockProvider::new(response),
            delay,
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Calls currently blocked inside `invoke`
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of overlapping calls seen so far
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Number of calls started
    pub fn call_count(&self) -> usize {
        self.inner.call_count()
    }
}

impl LlmProviderTrait for SlowProvider {
    type Error = LlmError;

    fn invoke(&self, prompt: &str, profile: &GenerationProfile) -> Result<LlmResponse, Self::Error> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        std::thread::sleep(self.delay);
        let result = self.inner.invoke(prompt, profile);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
