//! JSON files exchanged between pipeline stages.

use crate::error::Result;
use pageqa_domain::{GeneratedQuestion, QAPair};
use pageqa_synthesizer::AnswerBatchReport;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One record in the shape the publishing sink consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishRecord {
    /// The question text
    pub question: String,

    /// The answer text
    pub answer: String,

    /// Document the question came from
    pub source: String,
}

/// Project QA pairs onto publish records, in input order.
pub fn to_publish_records(pairs: &[QAPair]) -> Vec<PublishRecord> {
    pairs
        .iter()
        .map(|pair| PublishRecord {
            question: pair.question.clone(),
            answer: pair.answer.clone(),
            source: pair.source.clone(),
        })
        .collect()
}

/// Pairs to write to `qa_pairs.json`.
///
/// Ungrounded pairs follow the grounded ones when `include_ungrounded` is set.
pub fn dataset_pairs(report: &AnswerBatchReport, include_ungrounded: bool) -> Vec<QAPair> {
    let mut pairs = report.pairs.clone();
    if include_ungrounded {
        pairs.extend(report.ungrounded.iter().cloned());
    }
    pairs
}

/// Write any serializable records as a pretty-printed JSON array.
pub fn write_json<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(records)?)?;
    Ok(())
}

/// Read `questions.json`.
pub fn read_questions(path: &Path) -> Result<Vec<GeneratedQuestion>> {
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}

/// Read `qa_pairs.json`.
pub fn read_pairs(path: &Path) -> Result<Vec<QAPair>> {
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pageqa_domain::{Chunk, RetrievedChunk};

    fn question() -> GeneratedQuestion {
        GeneratedQuestion {
            question: "What is X?".to_string(),
            source: "doc.pdf".to_string(),
            page: 1,
            context: "X is a thing.".to_string(),
        }
    }

    #[test]
    fn test_publish_records_keep_three_fields() {
        let pair = QAPair::new(&question(), "A thing.", &[]);
        let records = to_publish_records(&[pair]);
        let value = serde_json::to_value(&records).unwrap();

        let obj = value[0].as_object().unwrap();
        assert_eq!(obj.len(), 3);
        assert_eq!(obj["question"], "What is X?");
        assert_eq!(obj["answer"], "A thing.");
        assert_eq!(obj["source"], "doc.pdf");
    }

    #[test]
    fn test_ungrounded_pairs_are_opt_in() {
        let support = vec![RetrievedChunk {
            chunk: Chunk::new("X is a thing.", "doc.pdf", 1),
            score: 0.9,
        }];
        let report = AnswerBatchReport {
            pairs: vec![QAPair::new(&question(), "A thing.", &support)],
            ungrounded: vec![QAPair::new(&question(), "A guess.", &[])],
            failures: Vec::new(),
        };

        assert_eq!(dataset_pairs(&report, false).len(), 1);
        let all = dataset_pairs(&report, true);
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].answer, "A guess.");
    }

    #[test]
    fn test_pairs_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("qa_pairs.json");
        let support = vec![RetrievedChunk {
            chunk: Chunk::new("X is a thing.", "doc.pdf", 1),
            score: 0.75,
        }];
        let pairs = vec![QAPair::new(&question(), "A thing.", &support)];

        write_json(&path, &pairs).unwrap();
        assert_eq!(read_pairs(&path).unwrap(), pairs);
    }

    #[test]
    fn test_questions_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("questions.json");
        write_json(&path, &[question()]).unwrap();
        assert_eq!(read_questions(&path).unwrap(), vec![question()]);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("questions.json");
        fs::write(&path, "{not json").unwrap();
        assert!(read_questions(&path).is_err());
    }
}
