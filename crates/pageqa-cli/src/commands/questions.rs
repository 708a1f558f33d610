//! Questions command implementation.

use crate::cli::QuestionsArgs;
use crate::error::Result;
use crate::export::write_json;
use crate::output::Formatter;
use crate::pipeline::Pipeline;
use pageqa_domain::traits::{EmbeddingModel, LlmProvider};
use pageqa_extractor::{list_documents, PdfPageSource, QuestionBatchReport};
use std::fmt::Display;

/// Execute the questions command.
pub async fn execute_questions<L, E>(args: QuestionsArgs, pipeline: &Pipeline<L, E>, formatter: &Formatter) -> Result<()>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display,
    E: EmbeddingModel + Send + Sync + 'static,
    E::Error: Display,
{
    let documents = list_documents(&args.pdf_dir)?;
    println!("{}", formatter.info(&format!("Found {} PDF(s) in {}", documents.len(), args.pdf_dir.display())));

    let report = pipeline.generate_questions(PdfPageSource, documents).await;
    print_question_report(&report, formatter);

    write_json(&args.out, &report.questions)?;
    println!(
        "{}",
        formatter.success(&format!("Wrote {} question(s) to {}", report.questions.len(), args.out.display()))
    );

    Ok(())
}

/// Print the summary table, any failures, and the abort warning.
pub fn print_question_report(report: &QuestionBatchReport, formatter: &Formatter) {
    println!("{}", formatter.question_report(report));

    let failures: Vec<_> = report
        .document_failures
        .iter()
        .chain(&report.page_failures)
        .cloned()
        .collect();
    if let Some(table) = formatter.failures(&failures) {
        println!("{}", table);
    }

    if report.aborted {
        println!(
            "{}",
            formatter.warning(&format!(
                "Run aborted after consecutive document failures ({} failed); {} document(s) were not processed",
                report.document_failures.len(),
                report.documents_skipped
            ))
        );
    }
}
