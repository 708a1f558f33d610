//! PageQA Extractor
//!
//! Turns PDF pages into generated questions using a creative-mode LLM.
//!
//! # Architecture
//!
//! ```text
//! PDF folder → PageExtractor → PageRecord → QuestionGenerator → GeneratedQuestion
//!                                   └──────── BatchRunner (documents × pages) ────────┘
//! ```
//!
//! # Key Features
//!
//! - **Page filtering**: Pages shorter than `min_page_chars` never reach the model
//! - **Prompt contract**: The model answers with `{"questions": [...]}`, raw or fenced
//! - **Failure absorption**: Malformed output means zero questions, not an error
//! - **Two-level concurrency**: Bounded document pool, bounded page pool per document
//! - **Early abort**: Consecutive failed documents stop further dispatch
//!
//! # Example Usage
//!
//! ```no_run
//! use pageqa_extractor::{BatchRunner, ExtractorConfig, MemoryPageSource, PageExtractor, QuestionGenerator};
//! use pageqa_llm::MockProvider;
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let mut source = MemoryPageSource::new();
//! source.add_document("doc.pdf", ["a long page of text ...".repeat(20)]);
//! let documents = source.document_paths();
//!
//! let config = ExtractorConfig::default();
//! let extractor = Arc::new(PageExtractor::new(source, config.min_page_chars));
//! let llm = Arc::new(MockProvider::new(r#"{"questions": ["What is X?"]}"#));
//! let generator = Arc::new(QuestionGenerator::new(llm, config.clone()));
//!
//! let report = BatchRunner::new(extractor, generator, config).run(documents).await;
//! println!("{}", report.summary());
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod generator;
mod pages;
mod parser;
mod prompt;
mod runner;
mod types;


pub use config::ExtractorConfig;
pub use error::ExtractorError;
pub use generator::QuestionGenerator;
pub use pages::{document_id, list_documents, MemoryPageSource, PageExtractor, PageSource, PdfPageSource};
pub use parser::parse_questions;
pub use prompt::QuestionPromptBuilder;
pub use runner::BatchRunner;
pub use types::{DocumentOutcome, PageOutcome, QuestionBatchReport};
