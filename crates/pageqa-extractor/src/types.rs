//! Outcome and report types for question generation

use pageqa_domain::{GeneratedQuestion, PageRecord, UnitFailure};

/// Result of generating questions for one page
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    /// At least one question was extracted
    Questions(Vec<GeneratedQuestion>),

    /// The model answered but no usable question came out
    Empty,

    /// The model call failed
    Failed(String),
}

impl PageOutcome {
    /// Whether the page counts as successfully processed
    pub fn is_processed(&self) -> bool {
        matches!(self, PageOutcome::Questions(_))
    }
}

/// Result of processing one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentOutcome {
    /// Pages were extracted and not every page failed
    Succeeded,

    /// Extraction failed, or every page failed
    Failed(String),
}

/// Everything a question-generation run produced
#[derive(Debug, Clone, Default)]
pub struct QuestionBatchReport {
    /// Questions from every processed page, in no particular order
    pub questions: Vec<GeneratedQuestion>,

    /// Extracted pages of every successful document
    pub pages: Vec<PageRecord>,

    /// Pages that yielded at least one question
    pub processed_pages: usize,

    /// Documents that succeeded
    pub documents_succeeded: usize,

    /// Pages whose model call failed
    pub page_failures: Vec<UnitFailure>,

    /// Documents that failed as a whole
    pub document_failures: Vec<UnitFailure>,

    /// Documents never dispatched because the run was aborted
    pub documents_skipped: usize,

    /// Whether the consecutive-failure threshold stopped dispatch
    pub aborted: bool,
}

impl QuestionBatchReport {
    /// One-line summary for logs and the CLI
    pub fn summary(&self) -> String {
        format!(
            "{} questions from {} pages ({} documents ok, {} failed, {} page failures){}",
            self.questions.len(),
            self.processed_pages,
            self.documents_succeeded,
            self.document_failures.len(),
            self.page_failures.len(),
            if self.aborted {
                format!(", aborted with {} documents skipped", self.documents_skipped)
            } else {
                String::new()
            }
        )
    }
}
