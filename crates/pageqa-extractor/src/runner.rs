//! Two-level concurrent question generation over documents and pages

use crate::config::ExtractorConfig;
use crate::generator::QuestionGenerator;
use crate::pages::{document_id, PageExtractor, PageSource};
use crate::types::{DocumentOutcome, PageOutcome, QuestionBatchReport};
use pageqa_domain::traits::LlmProvider;
use pageqa_domain::{PageRecord, UnitFailure};
use std::fmt::Display;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

/// Everything one document produced
struct DocumentReport {
    source: String,
    outcome: DocumentOutcome,
    pages: Vec<PageRecord>,
    page_outcomes: Vec<(u32, PageOutcome)>,
}

/// Fans question generation out across documents and their pages
///
/// At most `max_workers` documents are in flight, and each document runs
/// its pages on a pool of `min(max_workers, page_count)`. A failed page or
/// document is logged and left out of the report's questions; only a run of
/// `max_consecutive_failures` failed documents stops further dispatch.
pub struct BatchRunner<S, L> {
    extractor: Arc<PageExtractor<S>>,
    generator: Arc<QuestionGenerator<L>>,
    config: ExtractorConfig,
}

impl<S, L> BatchRunner<S, L>
where
    S: PageSource + 'static,
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display,
{
    /// Create a runner
    pub fn new(extractor: Arc<PageExtractor<S>>, generator: Arc<QuestionGenerator<L>>, config: ExtractorConfig) -> Self {
        Self {
            extractor,
            generator,
            config,
        }
    }

    /// Process `documents` and collect questions, pages and failures
    pub async fn run(&self, documents: Vec<PathBuf>) -> QuestionBatchReport {
        let max_workers = self.config.max_workers.max(1);
        let threshold = self.config.max_consecutive_failures.max(1);
        let total = documents.len();

        info!(documents = total, max_workers, "Starting question generation");

        let mut pending = documents.into_iter();
        let mut in_flight: JoinSet<DocumentReport> = JoinSet::new();
        let mut report = QuestionBatchReport::default();
        let mut consecutive_failures = 0usize;

        loop {
            while !report.aborted && in_flight.len() < max_workers {
                let Some(document) = pending.next() else { break };
                in_flight.spawn(process_document(
                    Arc::clone(&self.extractor),
                    Arc::clone(&self.generator),
                    document,
                    max_workers,
                ));
            }

            let Some(joined) = in_flight.join_next().await else {
                break;
            };

            let succeeded = match joined {
                Ok(document) => record_document(&mut report, document),
                Err(e) => {
                    warn!("Document task failed: {}", e);
                    report
                        .document_failures
                        .push(UnitFailure::document("<unknown>", format!("task failed: {}", e)));
                    false
                }
            };

            if succeeded {
                consecutive_failures = 0;
            } else {
                consecutive_failures += 1;
            }

            if !report.aborted && consecutive_failures >= threshold && !pending.as_slice().is_empty() {
                report.aborted = true;
                report.documents_skipped = pending.as_slice().len();
                error!(
                    consecutive_failures,
                    skipped = report.documents_skipped,
                    "Too many consecutive document failures, stopping dispatch"
                );
            }
        }

        info!("Question generation complete: {}", report.summary());
        report
    }
}

/// Fold one document into the report; returns whether it succeeded
fn record_document(report: &mut QuestionBatchReport, document: DocumentReport) -> bool {
    let DocumentReport {
        source,
        outcome,
        pages,
        page_outcomes,
    } = document;

    for (page, outcome) in page_outcomes {
        match outcome {
            PageOutcome::Questions(questions) => {
                report.processed_pages += 1;
                report.questions.extend(questions);
            }
            PageOutcome::Empty => {
                warn!(source = %source, page, "No questions extracted from page");
            }
            PageOutcome::Failed(reason) => {
                warn!(source = %source, page, reason = %reason, "Page failed");
                report.page_failures.push(UnitFailure::page(source.clone(), page, reason));
            }
        }
    }

    match outcome {
        DocumentOutcome::Succeeded => {
            report.documents_succeeded += 1;
            report.pages.extend(pages);
            true
        }
        DocumentOutcome::Failed(reason) => {
            warn!(source = %source, reason = %reason, "Document failed");
            report.document_failures.push(UnitFailure::document(source, reason));
            false
        }
    }
}

async fn process_document<S, L>(
    extractor: Arc<PageExtractor<S>>,
    generator: Arc<QuestionGenerator<L>>,
    document: PathBuf,
    max_workers: usize,
) -> DocumentReport
where
    S: PageSource + 'static,
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display,
{
    let source = document_id(&document);

    // lopdf parsing is blocking file work
    let extracted = tokio::task::spawn_blocking(move || extractor.extract(&document)).await;
    let pages = match extracted {
        Ok(Ok(pages)) => pages,
        Ok(Err(e)) => return failed_document(source, e.to_string()),
        Err(e) => return failed_document(source, format!("extraction task failed: {}", e)),
    };

    if pages.is_empty() {
        return DocumentReport {
            source,
            outcome: DocumentOutcome::Succeeded,
            pages,
            page_outcomes: Vec::new(),
        };
    }

    let width = max_workers.min(pages.len()).max(1);
    let permits = Arc::new(Semaphore::new(width));
    let mut tasks = JoinSet::new();

    for page in pages.iter().cloned() {
        let Ok(permit) = Arc::clone(&permits).acquire_owned().await else {
            break;
        };
        let generator = Arc::clone(&generator);
        tasks.spawn(async move {
            let _permit = permit;
            let outcome = generator.page_outcome(&page).await;
            (page.page, outcome)
        });
    }

    let mut page_outcomes = Vec::with_capacity(pages.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(result) => page_outcomes.push(result),
            Err(e) => page_outcomes.push((0, PageOutcome::Failed(format!("page task failed: {}", e)))),
        }
    }
    page_outcomes.sort_by_key(|(page, _)| *page);

    let all_failed = page_outcomes
        .iter()
        .all(|(_, outcome)| matches!(outcome, PageOutcome::Failed(_)));
    let outcome = if all_failed {
        DocumentOutcome::Failed(format!("all {} pages failed", page_outcomes.len()))
    } else {
        DocumentOutcome::Succeeded
    };

    DocumentReport {
        source,
        outcome,
        pages,
        page_outcomes,
    }
}

fn failed_document(source: String, reason: String) -> DocumentReport {
    DocumentReport {
        source,
        outcome: DocumentOutcome::Failed(reason),
        pages: Vec::new(),
        page_outcomes: Vec::new(),
    }
}
