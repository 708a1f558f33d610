//! Page records and provenance

use serde::{Deserialize, Serialize};
use std::fmt;

/// The origin of a derived record: which document, which page
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Provenance {
    /// Document identifier (the PDF file name)
    pub source: String,

    /// 1-based page number within the document
    pub page: u32,
}

impl Provenance {
    /// Create a new provenance pair
    pub fn new(source: impl Into<String>, page: u32) -> Self {
        Self {
            source: source.into(),
            page,
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#p{}", self.source, self.page)
    }
}

/// Raw text of a single page
///
/// One record exists per page that passed the extractor's minimum-length
/// filter. Page numbers follow the document's own page order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Document identifier
    pub source: String,

    /// 1-based page number
    pub page: u32,

    /// Extracted page text
    pub text: String,
}

impl PageRecord {
    /// Create a new page record
    pub fn new(source: impl Into<String>, page: u32, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            page,
            text: text.into(),
        }
    }

    /// The `(source, page)` pair of this record
    pub fn provenance(&self) -> Provenance {
        Provenance::new(self.source.clone(), self.page)
    }

    /// Length of the trimmed text in characters
    pub fn content_len(&self) -> usize {
        self.text.trim().chars().count()
    }

    /// First `max_chars` characters of the page text
    pub fn preview(&self, max_chars: usize) -> String {
        self.text.chars().take(max_chars).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_len_ignores_surrounding_whitespace() {
        let page = PageRecord::new("doc.pdf", 1, "  abc \n\n");
        assert_eq!(page.content_len(), 3);
    }

    #[test]
    fn test_preview_counts_characters_not_bytes() {
        let page = PageRecord::new("doc.pdf", 1, "héllo wörld");
        assert_eq!(page.preview(5), "héllo");
        assert_eq!(page.preview(100), "héllo wörld");
    }

    #[test]
    fn test_provenance_display() {
        let page = PageRecord::new("doc.pdf", 3, "text");
        assert_eq!(page.provenance().to_string(), "doc.pdf#p3");
    }
}
