//! Outcomes and reports of answer synthesis

use pageqa_domain::{QAPair, UnitFailure};
use serde::{Deserialize, Serialize};

/// Result of answering one question
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerOutcome {
    /// Answer backed by at least one retrieved chunk
    Grounded(QAPair),
    /// Answer produced without any retrieved chunk
    Ungrounded(QAPair),
}

impl AnswerOutcome {
    /// Classify a pair by its support set
    pub fn from_pair(pair: QAPair) -> Self {
        if pair.is_grounded() {
            AnswerOutcome::Grounded(pair)
        } else {
            AnswerOutcome::Ungrounded(pair)
        }
    }

    /// Whether the answer was grounded
    pub fn is_grounded(&self) -> bool {
        matches!(self, AnswerOutcome::Grounded(_))
    }

    /// The pair, regardless of grounding
    pub fn into_pair(self) -> QAPair {
        match self {
            AnswerOutcome::Grounded(pair) | AnswerOutcome::Ungrounded(pair) => pair,
        }
    }
}

/// Aggregate result of an answer batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerBatchReport {
    /// Grounded pairs, in no particular order
    pub pairs: Vec<QAPair>,

    /// Pairs whose retrieval found nothing
    pub ungrounded: Vec<QAPair>,

    /// Questions that produced no pair
    pub failures: Vec<UnitFailure>,
}

impl AnswerBatchReport {
    /// Questions accounted for by this report
    pub fn total(&self) -> usize {
        self.pairs.len() + self.ungrounded.len() + self.failures.len()
    }

    /// One-line summary for logs and the CLI
    pub fn summary(&self) -> String {
        format!(
            "{} grounded pairs, {} ungrounded, {} failed",
            self.pairs.len(),
            self.ungrounded.len(),
            self.failures.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pageqa_domain::{Chunk, GeneratedQuestion, RetrievedChunk};

    fn question() -> GeneratedQuestion {
        GeneratedQuestion {
            question: "What is X?".into(),
            source: "doc.pdf".into(),
            page: 1,
            context: "X".into(),
        }
    }

    #[test]
    fn test_outcome_follows_support() {
        let support = vec![RetrievedChunk {
            chunk: Chunk::new("X is a thing.", "doc.pdf", 1),
            score: 0.8,
        }];
        assert!(AnswerOutcome::from_pair(QAPair::new(&question(), "A", &support)).is_grounded());
        assert!(!AnswerOutcome::from_pair(QAPair::new(&question(), "A", &[])).is_grounded());
    }

    #[test]
    fn test_summary_counts() {
        let report = AnswerBatchReport {
            pairs: vec![QAPair::new(&question(), "A", &[])],
            ungrounded: Vec::new(),
            failures: vec![UnitFailure::question(&question(), "timeout")],
        };
        assert_eq!(report.total(), 2);
        assert_eq!(report.summary(), "1 grounded pairs, 0 ungrounded, 1 failed");
    }
}
