//! Export-publish command implementation.

use crate::cli::ExportPublishArgs;
use crate::error::{CliError, Result};
use crate::export::{read_pairs, to_publish_records, write_json};
use crate::output::Formatter;

/// Execute the export-publish command.
pub fn execute_export_publish(args: ExportPublishArgs, formatter: &Formatter) -> Result<()> {
    if !args.pairs.exists() {
        return Err(CliError::InvalidInput(format!(
            "{} does not exist; run `pageqa answer` first",
            args.pairs.display()
        )));
    }

    let pairs = read_pairs(&args.pairs)?;
    let records = to_publish_records(&pairs);
    write_json(&args.out, &records)?;

    println!(
        "{}",
        formatter.success(&format!("Wrote {} record(s) to {}", records.len(), args.out.display()))
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::PublishRecord;
    use pageqa_domain::{Chunk, GeneratedQuestion, QAPair, RetrievedChunk};
    use std::fs;

    #[test]
    fn test_export_writes_publish_records() {
        let dir = tempfile::tempdir().unwrap();
        let pairs_path = dir.path().join("qa_pairs.json");
        let out_path = dir.path().join("publish.json");

        let question = GeneratedQuestion {
            question: "What is X?".to_string(),
            source: "doc.pdf".to_string(),
            page: 1,
            context: "X is a thing.".to_string(),
        };
        let support = vec![RetrievedChunk {
            chunk: Chunk::new("X is a thing.", "doc.pdf", 1),
            score: 0.8,
        }];
        write_json(&pairs_path, &[QAPair::new(&question, "A thing.", &support)]).unwrap();

        execute_export_publish(
            ExportPublishArgs {
                pairs: pairs_path,
                out: out_path.clone(),
            },
            &Formatter::new(false),
        )
        .unwrap();

        let records: Vec<PublishRecord> = serde_json::from_str(&fs::read_to_string(out_path).unwrap()).unwrap();
        assert_eq!(
            records,
            vec![PublishRecord {
                question: "What is X?".to_string(),
                answer: "A thing.".to_string(),
                source: "doc.pdf".to_string(),
            }]
        );
    }

    #[test]
    fn test_missing_pairs_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = execute_export_publish(
            ExportPublishArgs {
                pairs: dir.path().join("missing.json"),
                out: dir.path().join("publish.json"),
            },
            &Formatter::new(false),
        );
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }
}
