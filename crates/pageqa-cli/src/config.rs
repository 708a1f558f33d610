//! Pipeline configuration file.

use crate::error::{CliError, Result};
use pageqa_extractor::ExtractorConfig;
use pageqa_indexer::{ChunkerConfig, IndexerConfig};
use pageqa_janitor::JanitorConfig;
use pageqa_llm::LlmConfig;
use pageqa_synthesizer::SynthesizerConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings for every pipeline stage, loaded from one TOML file.
///
/// Missing sections fall back to their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// SQLite database holding the vector tables
    pub db_path: Option<PathBuf>,

    /// LLM and embedding providers
    pub llm: LlmConfig,

    /// Page filter and question generation
    pub extractor: ExtractorConfig,

    /// Chunk sizing
    pub chunker: ChunkerConfig,

    /// Vector table build
    pub indexer: IndexerConfig,

    /// Answer generation
    pub synthesizer: SynthesizerConfig,

    /// Stale table sweep
    pub janitor: JanitorConfig,
}

const DEFAULT_DB: &str = "pageqa.db";

impl PipelineConfig {
    /// Default per-user configuration file path.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".pageqa").join("config.toml"))
    }

    /// Load from `path`, or from the default path if it exists, or defaults.
    ///
    /// An explicitly given path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Database path, with `--db` taking precedence.
    pub fn db_path(&self, flag: Option<&Path>) -> PathBuf {
        flag.map(Path::to_path_buf)
            .or_else(|| self.db_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB))
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        let sections: [(&str, std::result::Result<(), String>); 6] = [
            ("llm", self.llm.validate()),
            ("extractor", self.extractor.validate()),
            ("chunker", self.chunker.validate()),
            ("indexer", self.indexer.validate()),
            ("synthesizer", self.synthesizer.validate()),
            ("janitor", self.janitor.validate()),
        ];
        for (section, result) in sections {
            result.map_err(|e| CliError::Config(format!("[{}] {}", section, e)))?;
        }
        Ok(())
    }
}
