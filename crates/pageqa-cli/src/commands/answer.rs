//! Answer command implementation.

use crate::cli::AnswerArgs;
use crate::error::Result;
use crate::export::{dataset_pairs, read_questions, write_json};
use crate::output::Formatter;
use crate::pipeline::Pipeline;
use pageqa_domain::traits::{EmbeddingModel, LlmProvider};
use pageqa_domain::{GeneratedQuestion, UnitFailure};
use pageqa_extractor::{list_documents, PageSource, PdfPageSource};
use pageqa_indexer::IndexHandle;
use pageqa_synthesizer::AnswerBatchReport;
use std::fmt::Display;
use std::path::PathBuf;
use tracing::warn;

/// Index and answers produced from one set of documents
#[derive(Debug)]
pub struct AnswerOutput {
    /// The rebuilt vector table
    pub handle: IndexHandle,

    /// Answer batch result
    pub report: AnswerBatchReport,

    /// Documents whose pages could not be re-extracted
    pub extraction_failures: Vec<UnitFailure>,
}

/// Execute the answer command.
pub async fn execute_answer<L, E>(args: AnswerArgs, pipeline: &Pipeline<L, E>, formatter: &Formatter) -> Result<()>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display,
    E: EmbeddingModel + Send + Sync + 'static,
    E::Error: Display,
{
    let questions = read_questions(&args.questions)?;
    if questions.is_empty() {
        println!("{}", formatter.warning(&format!("{} contains no questions", args.questions.display())));
    }

    let documents = list_documents(&args.pdf_dir)?;
    let output = answer_from_source(pipeline, PdfPageSource, documents, questions).await?;

    println!("{}", formatter.index_handle(&output.handle));
    if let Some(table) = formatter.failures(&output.extraction_failures) {
        println!("{}", table);
    }
    println!("{}", formatter.answer_report(&output.report));
    if let Some(table) = formatter.failures(&output.report.failures) {
        println!("{}", table);
    }

    let pairs = dataset_pairs(&output.report, args.include_ungrounded);
    write_json(&args.out, &pairs)?;
    println!(
        "{}",
        formatter.success(&format!("Wrote {} QA pair(s) to {}", pairs.len(), args.out.display()))
    );

    Ok(())
}

/// Re-extract pages, rebuild the index, and answer `questions`.
pub async fn answer_from_source<L, E, P>(
    pipeline: &Pipeline<L, E>,
    source: P,
    documents: Vec<PathBuf>,
    questions: Vec<GeneratedQuestion>,
) -> Result<AnswerOutput>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display,
    E: EmbeddingModel + Send + Sync + 'static,
    E::Error: Display,
    P: PageSource + 'static,
{
    let (pages, extraction_failures) = pipeline.extract_pages(source, documents).await?;
    for failure in &extraction_failures {
        warn!(source = %failure.source, reason = %failure.reason, "Document left out of the index");
    }

    let handle = pipeline.build_index(&pages).await?;
    let report = pipeline.answer_questions(&handle, questions).await;

    Ok(AnswerOutput {
        handle,
        report,
        extraction_failures,
    })
}
