//! Stage wiring shared by every command.
//!
//! A [`Pipeline`] owns the store, the LLM and the embedder, and builds each
//! stage's runner from the loaded [`PipelineConfig`].

use crate::config::PipelineConfig;
use crate::error::Result;
use pageqa_domain::traits::{EmbeddingModel, LlmProvider};
use pageqa_domain::{GeneratedQuestion, PageRecord, UnitFailure};
use pageqa_extractor::{BatchRunner, PageExtractor, PageSource, QuestionBatchReport, QuestionGenerator};
use pageqa_indexer::{IndexBuilder, IndexHandle, Retriever, TextChunker};
use pageqa_janitor::{Janitor, JanitorConfig, SweepReport};
use pageqa_llm::{OllamaEmbedder, OllamaProvider};
use pageqa_store::SqliteVectorStore;
use pageqa_synthesizer::{AnswerBatchReport, AnswerBatchRunner, AnswerGenerator};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// The configured pipeline
pub struct Pipeline<L, E> {
    config: PipelineConfig,
    store: Arc<SqliteVectorStore>,
    llm: Arc<L>,
    embedder: Arc<E>,
}

impl Pipeline<OllamaProvider, OllamaEmbedder> {
    /// Open the database and create the Ollama clients.
    ///
    /// The clients are blocking HTTP clients: call this outside the async
    /// runtime and drop the pipeline outside it too.
    pub fn connect(config: PipelineConfig, db_path: &Path) -> Result<Self> {
        let llm = OllamaProvider::from_config(&config.llm)?;
        let embedder = OllamaEmbedder::from_config(&config.llm)?;
        let store = SqliteVectorStore::connect(db_path)?;
        info!(db = %db_path.display(), model = %config.llm.model, "Pipeline connected");
        Ok(Self::new(config, Arc::new(store), Arc::new(llm), Arc::new(embedder)))
    }
}

impl<L, E> Pipeline<L, E>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display,
    E: EmbeddingModel + Send + Sync + 'static,
    E::Error: Display,
{
    /// Assemble a pipeline from parts.
    pub fn new(config: PipelineConfig, store: Arc<SqliteVectorStore>, llm: Arc<L>, embedder: Arc<E>) -> Self {
        Self {
            config,
            store,
            llm,
            embedder,
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The vector store.
    pub fn store(&self) -> &Arc<SqliteVectorStore> {
        &self.store
    }

    /// Extract pages and generate questions with the creative profile.
    pub async fn generate_questions<P>(&self, source: P, documents: Vec<PathBuf>) -> QuestionBatchReport
    where
        P: PageSource + 'static,
    {
        let extractor_config = self.config.extractor.clone();
        let extractor = Arc::new(PageExtractor::new(source, extractor_config.min_page_chars));
        let generator = Arc::new(
            QuestionGenerator::new(Arc::clone(&self.llm), extractor_config.clone())
                .with_profile(self.config.llm.creative.clone()),
        );
        BatchRunner::new(extractor, generator, extractor_config)
            .run(documents)
            .await
    }

    /// Extract and filter pages without calling the model.
    pub async fn extract_pages<P>(&self, source: P, documents: Vec<PathBuf>) -> Result<(Vec<PageRecord>, Vec<UnitFailure>)>
    where
        P: PageSource + 'static,
    {
        let extractor = PageExtractor::new(source, self.config.extractor.min_page_chars);
        let extracted = tokio::task::spawn_blocking(move || extractor.extract_all(&documents))
            .await?;
        Ok(extracted)
    }

    /// Chunk `pages` and rebuild the configured vector table from them.
    pub async fn build_index(&self, pages: &[PageRecord]) -> Result<IndexHandle> {
        let chunker = TextChunker::new(self.config.chunker.clone())?;
        let chunks = chunker.chunk_pages(pages);
        info!(pages = pages.len(), chunks = chunks.len(), "Chunked pages");

        let builder = IndexBuilder::new(Arc::clone(&self.store), self.config.indexer.clone());
        Ok(builder.build(&chunks, Arc::clone(&self.embedder)).await?)
    }

    /// Answer `questions` from the table behind `handle` with the accurate profile.
    pub async fn answer_questions(&self, handle: &IndexHandle, questions: Vec<GeneratedQuestion>) -> AnswerBatchReport {
        let retriever = Retriever::from_handle(Arc::clone(&self.store), Arc::clone(&self.embedder), handle);
        let generator = AnswerGenerator::new(Arc::clone(&self.llm), retriever, self.config.synthesizer.clone())
            .with_profile(self.config.llm.accurate.clone());
        AnswerBatchRunner::new(Arc::new(generator)).run(questions).await
    }

    /// Sweep stale tables, optionally overriding the age threshold.
    pub fn sweep(&self, max_age_secs: Option<u64>, dry_run: bool) -> Result<SweepReport> {
        sweep_store(self.store.as_ref(), &self.config.janitor, max_age_secs, dry_run)
    }
}

/// Sweep stale tables in `store` without building the rest of the pipeline.
pub fn sweep_store(
    store: &SqliteVectorStore,
    config: &JanitorConfig,
    max_age_secs: Option<u64>,
    dry_run: bool,
) -> Result<SweepReport> {
    let config = JanitorConfig {
        max_age_secs: max_age_secs.unwrap_or(config.max_age_secs),
        dry_run: dry_run || config.dry_run,
        ..config.clone()
    };
    let mut janitor = Janitor::new(config);
    let report = janitor.sweep(store)?;
    debug!("{}", janitor.metrics().summary());
    Ok(report)
}
