//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// PageQA - Turn a folder of PDFs into grounded question/answer pairs.
#[derive(Debug, Parser)]
#[command(name = "pageqa")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "PAGEQA_CONFIG")]
    pub config: Option<PathBuf>,

    /// SQLite database holding the vector tables
    #[arg(long, global = true, env = "PAGEQA_DB")]
    pub db: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate questions from every PDF in a folder
    Questions(QuestionsArgs),

    /// Answer previously generated questions from the same PDFs
    Answer(AnswerArgs),

    /// Run the full pipeline and sweep stale tables afterwards
    Run(RunArgs),

    /// Remove renamed-aside vector tables
    Sweep(SweepArgs),

    /// Write QA pairs in the publishing shape
    ExportPublish(ExportPublishArgs),
}

/// Arguments for the questions command.
#[derive(Debug, Parser)]
pub struct QuestionsArgs {
    /// Folder containing the PDFs
    #[arg(long)]
    pub pdf_dir: PathBuf,

    /// Output file
    #[arg(short, long, default_value = "questions.json")]
    pub out: PathBuf,
}

/// Arguments for the answer command.
#[derive(Debug, Parser)]
pub struct AnswerArgs {
    /// Folder containing the PDFs the questions came from
    #[arg(long)]
    pub pdf_dir: PathBuf,

    /// Questions file written by `pageqa questions`
    #[arg(short, long, default_value = "questions.json")]
    pub questions: PathBuf,

    /// Output file
    #[arg(short, long, default_value = "qa_pairs.json")]
    pub out: PathBuf,

    /// Also write answers that no retrieved chunk supported
    #[arg(long)]
    pub include_ungrounded: bool,
}

/// Arguments for the run command.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Folder containing the PDFs
    #[arg(long)]
    pub pdf_dir: PathBuf,

    /// Folder receiving questions.json and qa_pairs.json
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Also write answers that no retrieved chunk supported
    #[arg(long)]
    pub include_ungrounded: bool,
}

/// Arguments for the sweep command.
#[derive(Debug, Parser)]
pub struct SweepArgs {
    /// Minimum age of a stale table before it is removed (overrides config)
    #[arg(long)]
    pub max_age_secs: Option<u64>,

    /// Report what would be removed without removing it
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the export-publish command.
#[derive(Debug, Parser)]
pub struct ExportPublishArgs {
    /// QA pairs file written by `pageqa answer` or `pageqa run`
    #[arg(short, long, default_value = "qa_pairs.json")]
    pub pairs: PathBuf,

    /// Output file
    #[arg(short, long, default_value = "publish.json")]
    pub out: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_questions_command() {
        let cli = Cli::parse_from(["pageqa", "questions", "--pdf-dir", "pdfs"]);
        match cli.command {
            Command::Questions(args) => {
                assert_eq!(args.pdf_dir, PathBuf::from("pdfs"));
                assert_eq!(args.out, PathBuf::from("questions.json"));
            }
            _ => panic!("Expected Questions command"),
        }
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::parse_from([
            "pageqa",
            "run",
            "--pdf-dir",
            "pdfs",
            "--out-dir",
            "out",
            "--db",
            "qa.db",
            "-v",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.db, Some(PathBuf::from("qa.db")));
        match cli.command {
            Command::Run(args) => assert_eq!(args.out_dir, PathBuf::from("out")),
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_sweep_overrides() {
        let cli = Cli::parse_from(["pageqa", "sweep", "--max-age-secs", "60", "--dry-run"]);
        match cli.command {
            Command::Sweep(args) => {
                assert_eq!(args.max_age_secs, Some(60));
                assert!(args.dry_run);
            }
            _ => panic!("Expected Sweep command"),
        }
    }

    #[test]
    fn test_export_publish_defaults() {
        let cli = Cli::parse_from(["pageqa", "export-publish"]);
        match cli.command {
            Command::ExportPublish(args) => {
                assert_eq!(args.pairs, PathBuf::from("qa_pairs.json"));
                assert_eq!(args.out, PathBuf::from("publish.json"));
            }
            _ => panic!("Expected ExportPublish command"),
        }
    }

    #[test]
    fn test_pdf_dir_is_required() {
        assert!(Cli::try_parse_from(["pageqa", "answer"]).is_err());
    }
}
