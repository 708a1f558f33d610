//! Run command implementation.

use crate::cli::RunArgs;
use crate::commands::questions::print_question_report;
use crate::error::Result;
use crate::export::{dataset_pairs, write_json};
use crate::output::Formatter;
use crate::pipeline::Pipeline;
use pageqa_domain::traits::{EmbeddingModel, LlmProvider};
use pageqa_extractor::{list_documents, PageSource, PdfPageSource, QuestionBatchReport};
use pageqa_indexer::IndexHandle;
use pageqa_synthesizer::AnswerBatchReport;
use std::fmt::Display;
use std::path::PathBuf;
use tracing::{info, warn};

/// Everything a full run produced
#[derive(Debug)]
pub struct RunOutcome {
    /// Question stage result, including the kept pages
    pub questions: QuestionBatchReport,

    /// The rebuilt vector table
    pub handle: IndexHandle,

    /// Answer stage result
    pub answers: AnswerBatchReport,
}

/// Execute the run command.
pub async fn execute_run<L, E>(args: RunArgs, pipeline: &Pipeline<L, E>, formatter: &Formatter) -> Result<()>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display,
    E: EmbeddingModel + Send + Sync + 'static,
    E::Error: Display,
{
    let documents = list_documents(&args.pdf_dir)?;
    println!("{}", formatter.info(&format!("Found {} PDF(s) in {}", documents.len(), args.pdf_dir.display())));

    let outcome = run_from_source(pipeline, PdfPageSource, documents).await?;

    print_question_report(&outcome.questions, formatter);
    println!("{}", formatter.index_handle(&outcome.handle));
    println!("{}", formatter.answer_report(&outcome.answers));
    if let Some(table) = formatter.failures(&outcome.answers.failures) {
        println!("{}", table);
    }

    let questions_path = args.out_dir.join("questions.json");
    let pairs_path = args.out_dir.join("qa_pairs.json");
    let pairs = dataset_pairs(&outcome.answers, args.include_ungrounded);
    write_json(&questions_path, &outcome.questions.questions)?;
    write_json(&pairs_path, &pairs)?;
    println!(
        "{}",
        formatter.success(&format!(
            "Wrote {} question(s) and {} QA pair(s) to {}",
            outcome.questions.questions.len(),
            pairs.len(),
            args.out_dir.display()
        ))
    );

    // Exit-time sweep is best effort
    match pipeline.sweep(None, false) {
        Ok(report) if !report.removed.is_empty() => {
            println!("{}", formatter.info(&format!("Swept {} stale table(s)", report.removed.len())));
        }
        Ok(_) => {}
        Err(e) => warn!(error = %e, "Stale table sweep failed"),
    }

    Ok(())
}

/// Generate questions, index the kept pages, and answer every question.
///
/// Pages are extracted once; the index is built from the pages the
/// question stage kept.
pub async fn run_from_source<L, E, P>(pipeline: &Pipeline<L, E>, source: P, documents: Vec<PathBuf>) -> Result<RunOutcome>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display,
    E: EmbeddingModel + Send + Sync + 'static,
    E::Error: Display,
    P: PageSource + 'static,
{
    let questions = pipeline.generate_questions(source, documents).await;
    info!("Question stage: {}", questions.summary());

    let handle = pipeline.build_index(&questions.pages).await?;
    let answers = pipeline
        .answer_questions(&handle, questions.questions.clone())
        .await;

    Ok(RunOutcome {
        questions,
        handle,
        answers,
    })
}
