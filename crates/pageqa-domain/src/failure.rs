//! Records of dropped units of work

use crate::question::GeneratedQuestion;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A unit of work (document, page or question) that was dropped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitFailure {
    /// Document identifier
    pub source: String,

    /// Page number, when the failure is page-level
    pub page: Option<u32>,

    /// Question text, when the failure is question-level
    pub question: Option<String>,

    /// Why the unit was dropped
    pub reason: String,
}

impl UnitFailure {
    /// Failure of a whole document
    pub fn document(source: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            page: None,
            question: None,
            reason: reason.into(),
        }
    }

    /// Failure of a single page
    pub fn page(source: impl Into<String>, page: u32, reason: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            page: Some(page),
            question: None,
            reason: reason.into(),
        }
    }

    /// Failure of a single question
    pub fn question(question: &GeneratedQuestion, reason: impl Into<String>) -> Self {
        Self {
            source: question.source.clone(),
            page: Some(question.page),
            question: Some(question.question.clone()),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for UnitFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)?;
        if let Some(page) = self.page {
            write!(f, "#p{}", page)?;
        }
        if let Some(question) = &self.question {
            write!(f, " ({:?})", question)?;
        }
        write!(f, ": {}", self.reason)
    }
}
