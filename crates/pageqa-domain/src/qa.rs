//! Question/answer pairs, the terminal pipeline record

use crate::chunk::RetrievedChunk;
use crate::question::GeneratedQuestion;
use serde::{Deserialize, Serialize};

/// Frozen copy of one chunk that grounded an answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDocument {
    /// Document identifier
    pub source: String,

    /// 1-based page number
    pub page: u32,

    /// Chunk text passed to the model
    pub content: String,
}

impl From<&RetrievedChunk> for SourceDocument {
    fn from(retrieved: &RetrievedChunk) -> Self {
        Self {
            source: retrieved.chunk.source.clone(),
            page: retrieved.chunk.page,
            content: retrieved.chunk.text.clone(),
        }
    }
}

/// An answered question with its supporting context
///
/// `source_documents` owns copies of the supporting chunks, so a later index
/// rebuild cannot change an already exported pair. An empty support set means
/// retrieval degraded; see [`QAPair::is_grounded`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QAPair {
    /// The question text
    pub question: String,

    /// The generated answer
    pub answer: String,

    /// Page preview carried over from the question
    pub context: String,

    /// Document the question was generated from
    pub source: String,

    /// Page the question was generated from
    pub page: u32,

    /// Chunks that grounded the answer, in retrieval order
    pub source_documents: Vec<SourceDocument>,
}

impl QAPair {
    /// Assemble a pair from a question, its answer and the chunks used
    pub fn new(question: &GeneratedQuestion, answer: impl Into<String>, support: &[RetrievedChunk]) -> Self {
        Self {
            question: question.question.clone(),
            answer: answer.into(),
            context: question.context.clone(),
            source: question.source.clone(),
            page: question.page,
            source_documents: support.iter().map(SourceDocument::from).collect(),
        }
    }

    /// Whether at least one chunk supported the answer
    pub fn is_grounded(&self) -> bool {
        !self.source_documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::Chunk;

    fn question() -> GeneratedQuestion {
        GeneratedQuestion {
            question: "What is X?".to_string(),
            source: "doc.pdf".to_string(),
            page: 1,
            context: "X is a thing.".to_string(),
        }
    }

    #[test]
    fn test_pair_copies_support() {
        let support = vec![RetrievedChunk {
            chunk: Chunk::new("X is a thing.", "doc.pdf", 1),
            score: 0.9,
        }];
        let pair = QAPair::new(&question(), "A thing.", &support);

        assert!(pair.is_grounded());
        assert_eq!(pair.source_documents.len(), 1);
        assert_eq!(pair.source_documents[0].content, "X is a thing.");
        assert_eq!(pair.source_documents[0].page, 1);
    }

    #[test]
    fn test_empty_support_is_ungrounded() {
        let pair = QAPair::new(&question(), "A thing.", &[]);
        assert!(!pair.is_grounded());
    }

    #[test]
    fn test_json_field_names_are_fixed() {
        let pair = QAPair::new(&question(), "A thing.", &[]);
        let value = serde_json::to_value(&pair).unwrap();
        let obj = value.as_object().unwrap();

        for key in ["question", "answer", "context", "source", "page", "source_documents"] {
            assert!(obj.contains_key(key), "missing key {key}");
        }
        assert_eq!(obj.len(), 6);
    }

    #[test]
    fn test_json_round_trip_preserves_values() {
        let support = vec![RetrievedChunk {
            chunk: Chunk::new("Précis \"quoted\"\nline", "dir/doc.pdf", 12),
            score: 0.5,
        }];
        let pair = QAPair::new(&question(), "Ünïcode answer", &support);

        let json = serde_json::to_string(&vec![pair.clone()]).unwrap();
        let parsed: Vec<QAPair> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, vec![pair]);
    }
}
