//! Generated questions

use crate::page::{PageRecord, Provenance};
use serde::{Deserialize, Serialize};

/// A question generated by the LLM for one page
///
/// Never mutated after creation. `context` holds a fixed-length preview of
/// the page text the question was generated from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedQuestion {
    /// The question text
    pub question: String,

    /// Document identifier
    pub source: String,

    /// 1-based page number
    pub page: u32,

    /// Page text truncated to the preview length
    pub context: String,
}

impl GeneratedQuestion {
    /// Build a question for `page`, truncating the page text to `preview_chars`
    pub fn for_page(question: impl Into<String>, page: &PageRecord, preview_chars: usize) -> Self {
        Self {
            question: question.into(),
            source: page.source.clone(),
            page: page.page,
            context: page.preview(preview_chars),
        }
    }

    /// The `(source, page)` pair of this question
    pub fn provenance(&self) -> Provenance {
        Provenance::new(self.source.clone(), self.page)
    }
}
