//! Question generation for a single page

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::parser::parse_questions;
use crate::prompt::QuestionPromptBuilder;
use crate::types::PageOutcome;
use pageqa_domain::traits::LlmProvider;
use pageqa_domain::{GeneratedQuestion, GenerationProfile, PageRecord};
use std::fmt::Display;
use std::sync::Arc;
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

/// Generates questions for page text with the creative LLM profile
pub struct QuestionGenerator<L> {
    llm: Arc<L>,
    profile: GenerationProfile,
    config: ExtractorConfig,
}

impl<L> QuestionGenerator<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display,
{
    /// Create a new generator using the creative profile
    pub fn new(llm: Arc<L>, config: ExtractorConfig) -> Self {
        Self {
            llm,
            profile: GenerationProfile::creative(),
            config,
        }
    }

    /// Replace the sampling profile
    pub fn with_profile(mut self, profile: GenerationProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Configuration in use
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Questions for `page_text`; every failure is logged and yields an empty list
    pub async fn generate(&self, page_text: &str) -> Vec<String> {
        match self.question_texts(page_text).await {
            Ok(questions) => questions,
            Err(e) => {
                warn!("Question generation failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Questions for one page
    ///
    /// Model and transport errors are returned; malformed output is `Ok(vec![])`.
    pub async fn try_generate(&self, page: &PageRecord) -> Result<Vec<GeneratedQuestion>, ExtractorError> {
        let chars = page.content_len();
        if chars < self.config.min_page_chars {
            return Err(ExtractorError::PageTooShort {
                source_id: page.source.clone(),
                page: page.page,
                chars,
                min: self.config.min_page_chars,
            });
        }

        let questions = self.call_and_parse(&page.text).await?;
        debug!(
            source = %page.source,
            page = page.page,
            count = questions.len(),
            "Generated questions"
        );

        Ok(questions
            .into_iter()
            .map(|q| GeneratedQuestion::for_page(q, page, self.config.context_preview_chars))
            .collect())
    }

    /// Explicit outcome for one page, as used by the batch runner
    pub async fn page_outcome(&self, page: &PageRecord) -> PageOutcome {
        match self.try_generate(page).await {
            Ok(questions) if questions.is_empty() => PageOutcome::Empty,
            Ok(questions) => PageOutcome::Questions(questions),
            Err(e) => PageOutcome::Failed(e.to_string()),
        }
    }

    async fn question_texts(&self, page_text: &str) -> Result<Vec<String>, ExtractorError> {
        let chars = page_text.trim().chars().count();
        if chars < self.config.min_page_chars {
            return Err(ExtractorError::PageTooShort {
                source_id: String::new(),
                page: 0,
                chars,
                min: self.config.min_page_chars,
            });
        }
        self.call_and_parse(page_text).await
    }

    async fn call_and_parse(&self, page_text: &str) -> Result<Vec<String>, ExtractorError> {
        let prompt = QuestionPromptBuilder::new(page_text, self.config.max_questions_per_page).build();
        let response = self.call_llm(prompt).await?;
        Ok(parse_questions(&response, self.config.max_questions_per_page))
    }

    /// Call the LLM under the per-call timeout, then pause for the call delay
    ///
    /// A timed-out call is reported as `Timeout` only once the provider has
    /// returned, so a caller's worker slot covers the whole request.
    async fn call_llm(&self, prompt: String) -> Result<String, ExtractorError> {
        let llm = Arc::clone(&self.llm);
        let profile = self.profile.clone();

        // Call in a blocking context since LlmProvider is not async
        let mut call = tokio::task::spawn_blocking(move || {
            llm.invoke(&prompt, &profile)
                .map(|response| response.text)
                .map_err(|e| ExtractorError::Llm(e.to_string()))
        });

        let limit = self.config.call_timeout();
        let result = match timeout(limit, &mut call).await {
            Ok(joined) => joined.map_err(ExtractorError::from).and_then(|r| r),
            Err(_) => {
                let limit_ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX);
                warn!(timeout_ms = limit_ms, "LLM call timed out, waiting for it to return");
                // A blocking call cannot be cancelled; the worker stays busy until it returns
                let _ = call.await;
                Err(ExtractorError::Timeout(limit_ms))
            }
        };

        if self.config.call_delay_ms > 0 {
            sleep(self.config.call_delay()).await;
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pageqa_domain::ProfileKind;
    use pageqa_llm::{MockProvider, SlowProvider};
    use std::time::{Duration, Instant};

    fn config() -> ExtractorConfig {
        ExtractorConfig {
            call_delay_ms: 0,
            ..ExtractorConfig::default()
        }
    }

    fn long_page() -> PageRecord {
        PageRecord::new("doc.pdf", 1, "Plants convert light into sugar. ".repeat(20))
    }

    #[tokio::test]
    async fn test_try_generate_builds_questions() {
        let llm = Arc::new(MockProvider::new(r#"{"questions": ["What is X?", "How does Y work?"]}"#));
        let generator = QuestionGenerator::new(Arc::clone(&llm), config());

        let questions = generator.try_generate(&long_page()).await.unwrap();
        assert_eq!(questions.len(), 2);
        assert!(questions.iter().all(|q| q.source == "doc.pdf" && q.page == 1));
        assert_eq!(questions[0].context.chars().count(), 500);
        assert_eq!(llm.recorded_profiles(), vec![ProfileKind::Creative]);
    }

    #[tokio::test]
    async fn test_short_page_is_never_submitted() {
        let llm = Arc::new(MockProvider::new(r#"{"questions": ["Q?"]}"#));
        let generator = QuestionGenerator::new(Arc::clone(&llm), config());

        let page = PageRecord::new("doc.pdf", 2, "y".repeat(50));
        let result = generator.try_generate(&page).await;

        assert!(matches!(result, Err(ExtractorError::PageTooShort { chars: 50, .. })));
        assert!(generator.generate(&page.text).await.is_empty());
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_output_is_empty_not_error() {
        let llm = Arc::new(MockProvider::new("I cannot help with that."));
        let generator = QuestionGenerator::new(llm, config());

        let questions = generator.try_generate(&long_page()).await.unwrap();
        assert!(questions.is_empty());
        assert_eq!(generator.page_outcome(&long_page()).await, PageOutcome::Empty);
    }

    #[tokio::test]
    async fn test_model_error_is_err_but_generate_absorbs_it() {
        let mut llm = MockProvider::default();
        llm.add_error_containing("Plants convert");
        let generator = QuestionGenerator::new(Arc::new(llm), config());

        assert!(matches!(generator.try_generate(&long_page()).await, Err(ExtractorError::Llm(_))));
        assert!(generator.generate(&long_page().text).await.is_empty());
        assert!(matches!(generator.page_outcome(&long_page()).await, PageOutcome::Failed(_)));
    }

    #[tokio::test]
    async fn test_generate_returns_strings() {
        let llm = Arc::new(MockProvider::new("```json\n{\"questions\": [\"A?\", 7, \"B?\"]}\n```"));
        let generator = QuestionGenerator::new(llm, config());

        assert_eq!(generator.generate(&long_page().text).await, vec!["A?", "B?"]);
    }

    #[tokio::test]
    async fn test_call_delay_follows_each_call() {
        let llm = Arc::new(MockProvider::new(r#"{"questions": ["Q?"]}"#));
        let generator = QuestionGenerator::new(
            llm,
            ExtractorConfig {
                call_delay_ms: 50,
                ..ExtractorConfig::default()
            },
        );

        let start = std::time::Instant::now();
        generator.try_generate(&long_page()).await.unwrap();
        generator.try_generate(&long_page()).await.unwrap();
        assert!(start.elapsed() >= std::time::Duration::from_millis(100));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_hung_provider_times_out_after_it_returns() {
        let llm = Arc::new(SlowProvider::new(r#"{"questions": ["Q?"]}"#, Duration::from_millis(300)));
        let generator = QuestionGenerator::new(
            Arc::clone(&llm),
            ExtractorConfig {
                call_timeout_ms: Some(50),
                ..config()
            },
        );

        let start = Instant::now();
        let result = generator.try_generate(&long_page()).await;

        assert!(matches!(result, Err(ExtractorError::Timeout(50))));
        assert!(start.elapsed() >= Duration::from_millis(300));
        assert_eq!(llm.in_flight(), 0);

        match generator.page_outcome(&long_page()).await {
            PageOutcome::Failed(reason) => assert!(reason.contains("timed out after 50ms")),
            other => panic!("expected a failed page, got {:?}", other),
        }
    }
}
