//! Grounded answer generation for one question

use crate::config::SynthesizerConfig;
use crate::error::SynthesizerError;
use crate::parser::parse_answer;
use crate::prompt::AnswerPromptBuilder;
use crate::types::AnswerOutcome;
use pageqa_domain::traits::{EmbeddingModel, LlmProvider};
use pageqa_domain::{GeneratedQuestion, GenerationProfile, QAPair};
use pageqa_indexer::Retriever;
use pageqa_store::VectorStore;
use std::fmt::Display;
use std::sync::Arc;
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

/// Answers questions from retrieved context with the accurate LLM profile
pub struct AnswerGenerator<L, S, E> {
    llm: Arc<L>,
    retriever: Retriever<S, E>,
    profile: GenerationProfile,
    config: SynthesizerConfig,
}

impl<L, S, E> AnswerGenerator<L, S, E>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display,
    S: VectorStore + 'static,
    E: EmbeddingModel + Send + Sync + 'static,
    E::Error: Display,
{
    /// Create a new generator using the accurate profile
    pub fn new(llm: Arc<L>, retriever: Retriever<S, E>, config: SynthesizerConfig) -> Self {
        Self {
            llm,
            retriever,
            profile: GenerationProfile::accurate(),
            config,
        }
    }

    /// Replace the sampling profile
    pub fn with_profile(mut self, profile: GenerationProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Configuration in use
    pub fn config(&self) -> &SynthesizerConfig {
        &self.config
    }

    /// Answer one question
    ///
    /// Retrieves up to `top_k` chunks, asks the model, and classifies the
    /// resulting pair by whether any chunk supported it. No retries.
    pub async fn answer(&self, question: &GeneratedQuestion) -> Result<AnswerOutcome, SynthesizerError> {
        let retriever = self.retriever.clone();
        let query = question.question.clone();
        let top_k = self.config.top_k;
        let support = tokio::task::spawn_blocking(move || retriever.retrieve(&query, top_k)).await??;

        debug!(
            source = %question.source,
            page = question.page,
            retrieved = support.len(),
            "Answering question"
        );

        let prompt = AnswerPromptBuilder::new(&question.question)
            .with_context(&support)
            .build();
        let response = self.call_llm(prompt).await?;
        let answer = parse_answer(&response)?;

        Ok(AnswerOutcome::from_pair(QAPair::new(question, answer, &support)))
    }

    /// Call the LLM under the per-call timeout, then pause for the call delay
    ///
    /// A timed-out call is reported as `Timeout` only once the provider has
    /// returned, so a caller's worker slot covers the whole request.
    async fn call_llm(&self, prompt: String) -> Result<String, SynthesizerError> {
        let llm = Arc::clone(&self.llm);
        let profile = self.profile.clone();

        let mut call = tokio::task::spawn_blocking(move || {
            llm.invoke(&prompt, &profile)
                .map(|response| response.text)
                .map_err(|e| SynthesizerError::Llm(e.to_string()))
        });

        let limit = self.config.call_timeout();
        let result = match timeout(limit, &mut call).await {
            Ok(joined) => joined.map_err(SynthesizerError::from).and_then(|r| r),
            Err(_) => {
                let limit_ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX);
                warn!(timeout_ms = limit_ms, "LLM call timed out, waiting for it to return");
                // A blocking call cannot be cancelled; the worker stays busy until it returns
                let _ = call.await;
                Err(SynthesizerError::Timeout(limit_ms))
            }
        };

        if self.config.call_delay_ms > 0 {
            sleep(self.config.call_delay()).await;
        }

        result
    }
}
