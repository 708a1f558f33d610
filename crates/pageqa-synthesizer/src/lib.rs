//! PageQA Synthesizer
//!
//! Answers generated questions from retrieved page chunks.
//!
//! # Architecture
//!
//! ```text
//! GeneratedQuestion ──> Retriever (top_k) ──> AnswerPromptBuilder ──> LLM (accurate)
//!                                                                       │
//!                              AnswerOutcome::{Grounded, Ungrounded} <──┘ parse_answer
//! ```
//!
//! - **AnswerGenerator**: One question in, one classified [`QAPair`] out
//! - **AnswerBatchRunner**: Bounded concurrency over a batch; failures are
//!   collected as [`UnitFailure`]s and never abort the batch
//!
//! [`QAPair`]: pageqa_domain::QAPair
//! [`UnitFailure`]: pageqa_domain::UnitFailure

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod error;
mod generator;
mod parser;
mod prompt;
mod runner;
mod types;

pub use config::SynthesizerConfig;
pub use error::SynthesizerError;
pub use generator::AnswerGenerator;
pub use parser::parse_answer;
pub use prompt::AnswerPromptBuilder;
pub use runner::AnswerBatchRunner;
pub use types::{AnswerBatchReport, AnswerOutcome};
