//! PageQA CLI library.
//!
//! Wires the extractor, indexer, synthesizer and janitor crates into the
//! `pageqa` commands, and owns configuration loading and output formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod output;
pub mod pipeline;

pub use cli::{Cli, Command};
pub use config::PipelineConfig;
pub use error::{CliError, Result};
pub use export::{to_publish_records, PublishRecord};
pub use output::Formatter;
pub use pipeline::Pipeline;
