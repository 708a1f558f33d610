//! Bounded-concurrency answering over a batch of questions

use crate::generator::AnswerGenerator;
use crate::types::{AnswerBatchReport, AnswerOutcome};
use pageqa_domain::traits::{EmbeddingModel, LlmProvider};
use pageqa_domain::{GeneratedQuestion, UnitFailure};
use pageqa_store::VectorStore;
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::{Id, JoinError, JoinSet};
use tracing::{info, warn};

/// Answers every question with at most `max_workers` in flight
pub struct AnswerBatchRunner<L, S, E> {
    generator: Arc<AnswerGenerator<L, S, E>>,
    max_workers: usize,
}

impl<L, S, E> AnswerBatchRunner<L, S, E>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display,
    S: VectorStore + 'static,
    E: EmbeddingModel + Send + Sync + 'static,
    E::Error: Display,
{
    /// Create a runner; the worker count comes from the generator's config
    pub fn new(generator: Arc<AnswerGenerator<L, S, E>>) -> Self {
        let max_workers = generator.config().max_workers.max(1);
        Self { generator, max_workers }
    }

    /// Answer all questions
    ///
    /// A failed question is recorded and never stops the batch. Output order
    /// is unspecified.
    pub async fn run(&self, questions: Vec<GeneratedQuestion>) -> AnswerBatchReport {
        info!(questions = questions.len(), workers = self.max_workers, "Answering questions");

        let permits = Arc::new(Semaphore::new(self.max_workers));
        let mut tasks = JoinSet::new();
        let mut pending: HashMap<Id, GeneratedQuestion> = HashMap::with_capacity(questions.len());

        for question in questions {
            let permits = Arc::clone(&permits);
            let generator = Arc::clone(&self.generator);
            let asked = question.clone();
            let handle = tasks.spawn(async move {
                match permits.acquire_owned().await {
                    Ok(_permit) => generator.answer(&asked).await.map_err(|e| e.to_string()),
                    Err(e) => Err(e.to_string()),
                }
            });
            pending.insert(handle.id(), question);
        }

        let mut report = AnswerBatchReport::default();
        while let Some(joined) = tasks.join_next_with_id().await {
            let Some((question, result)) = settle(joined, &mut pending) else {
                continue;
            };
            match result {
                Ok(AnswerOutcome::Grounded(pair)) => report.pairs.push(pair),
                Ok(AnswerOutcome::Ungrounded(pair)) => {
                    warn!(source = %question.source, page = question.page, "Answer has no supporting chunks");
                    report.ungrounded.push(pair);
                }
                Err(reason) => {
                    warn!(
                        source = %question.source,
                        page = question.page,
                        question = %question.question,
                        error = %reason,
                        "Dropping question"
                    );
                    report.failures.push(UnitFailure::question(&question, reason));
                }
            }
        }

        info!("Answer batch complete: {}", report.summary());
        report
    }
}

type TaskResult = Result<AnswerOutcome, String>;

/// Pair a finished task with the question it was answering
///
/// A task that panicked or was cancelled still resolves to its question, with
/// the join error as the failure reason.
fn settle(
    joined: Result<(Id, TaskResult), JoinError>,
    pending: &mut HashMap<Id, GeneratedQuestion>,
) -> Option<(GeneratedQuestion, TaskResult)> {
    let (id, result) = match joined {
        Ok((id, result)) => (id, result),
        Err(e) => {
            warn!(error = %e, "Answer task failed");
            (e.id(), Err(format!("answer task failed: {}", e)))
        }
    };
    let question = pending.remove(&id)?;
    Some((question, result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SynthesizerConfig;
    use pageqa_domain::{Chunk, EmbeddedChunk};
    use pageqa_indexer::Retriever;
    use pageqa_llm::{MockProvider, SlowProvider};
    use std::time::Duration;
    use pageqa_store::{MockEmbeddingModel, SqliteVectorStore};

    fn question(text: &str, page: u32) -> GeneratedQuestion {
        GeneratedQuestion {
            question: text.into(),
            source: "doc.pdf".into(),
            page,
            context: String::new(),
        }
    }

    fn config() -> SynthesizerConfig {
        SynthesizerConfig {
            call_delay_ms: 0,
            max_workers: 2,
            ..SynthesizerConfig::default()
        }
    }

    fn runner(llm: MockProvider, texts: &[&str]) -> AnswerBatchRunner<MockProvider, SqliteVectorStore, MockEmbeddingModel> {
        runner_with(llm, texts, config())
    }

    fn runner_with<L>(
        llm: L,
        texts: &[&str],
        config: SynthesizerConfig,
    ) -> AnswerBatchRunner<L, SqliteVectorStore, MockEmbeddingModel>
    where
        L: LlmProvider + Send + Sync + 'static,
        L::Error: Display,
    {
        let store = Arc::new(SqliteVectorStore::connect(":memory:").unwrap());
        let embedder = Arc::new(MockEmbeddingModel::new(32));
        let rows: Vec<EmbeddedChunk> = texts
            .iter()
            .map(|text| EmbeddedChunk::new(Chunk::new(*text, "doc.pdf", 1), embedder.embed(text).unwrap()))
            .collect();
        store.create_table("pages", 32, &rows).unwrap();

        let generator = AnswerGenerator::new(Arc::new(llm), Retriever::new(store, embedder, "pages"), config);
        AnswerBatchRunner::new(Arc::new(generator))
    }

    #[tokio::test]
    async fn test_failures_are_isolated() {
        let mut llm = MockProvider::new(r#"{"answer": "fine"}"#);
        llm.add_error_containing("Question: Q3?");
        let questions: Vec<GeneratedQuestion> = (1..=5).map(|i| question(&format!("Q{}?", i), i)).collect();

        let report = runner(llm, &["Some context text."]).run(questions).await;

        assert_eq!(report.pairs.len(), 4);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].question.as_deref(), Some("Q3?"));
        assert_eq!(report.failures[0].page, Some(3));
        assert_eq!(report.total(), 5);
    }

    #[tokio::test]
    async fn test_ungrounded_pairs_are_kept_apart() {
        let report = runner(MockProvider::new("Unknown."), &[])
            .run(vec![question("Q1?", 1), question("Q2?", 1)])
            .await;

        assert!(report.pairs.is_empty());
        assert_eq!(report.ungrounded.len(), 2);
        assert!(report.failures.is_empty());
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let report = runner(MockProvider::new("x"), &["ctx"]).run(Vec::new()).await;
        assert_eq!(report, AnswerBatchReport::default());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_timed_out_questions_are_dropped_without_freeing_workers() {
        let llm = SlowProvider::new(r#"{"answer": "late"}"#, Duration::from_millis(200));
        let config = SynthesizerConfig {
            call_timeout_ms: Some(50),
            ..config()
        };
        let questions: Vec<GeneratedQuestion> = (1..=4).map(|i| question(&format!("Q{}?", i), i)).collect();

        let report = runner_with(llm.clone(), &["Some context text."], config).run(questions).await;

        assert!(llm.peak() <= 2);
        assert_eq!(llm.in_flight(), 0);
        assert!(report.pairs.is_empty());
        assert_eq!(report.failures.len(), 4);
        assert!(report.failures.iter().all(|f| f.question.is_some() && f.reason.contains("timed out")));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_answer_pool_never_exceeds_max_workers() {
        let llm = SlowProvider::new(r#"{"answer": "fine"}"#, Duration::from_millis(50));
        let questions: Vec<GeneratedQuestion> = (1..=6).map(|i| question(&format!("Q{}?", i), i)).collect();

        let report = runner_with(llm.clone(), &["Some context text."], config()).run(questions).await;

        assert!(llm.peak() <= 2);
        assert_eq!(llm.call_count(), 6);
        assert_eq!(report.pairs.len(), 6);
    }

    fn explode() -> TaskResult {
        panic!("parser blew up")
    }

    #[tokio::test]
    async fn test_panicked_task_keeps_its_question() {
        let mut tasks: JoinSet<TaskResult> = JoinSet::new();
        let mut pending = HashMap::new();
        let handle = tasks.spawn(async { explode() });
        pending.insert(handle.id(), question("Q9?", 9));

        let joined = tasks.join_next_with_id().await.unwrap();
        let (question, result) = settle(joined, &mut pending).unwrap();

        assert_eq!(question.question, "Q9?");
        let failure = UnitFailure::question(&question, result.unwrap_err());
        assert_eq!(failure.question.as_deref(), Some("Q9?"));
        assert_eq!(failure.page, Some(9));
        assert!(failure.reason.starts_with("answer task failed"));
        assert!(pending.is_empty());
    }
}
