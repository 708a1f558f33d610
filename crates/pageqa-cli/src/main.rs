//! PageQA CLI - Generate grounded question/answer datasets from PDFs.

use clap::Parser;
use pageqa_cli::commands;
use pageqa_cli::{Cli, Command, Formatter, Pipeline, PipelineConfig};
use pageqa_store::SqliteVectorStore;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let formatter = Formatter::new(!cli.no_color);
    if let Err(e) = run(cli, &formatter) {
        eprintln!("{}", formatter.error(&e.to_string()));
        std::process::exit(1);
    }
}

/// Log to stderr so stdout carries only command output
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli, formatter: &Formatter) -> pageqa_cli::Result<()> {
    let config = PipelineConfig::load(cli.config.as_deref())?;
    let db_path = config.db_path(cli.db.as_deref());

    match cli.command {
        Command::Sweep(args) => {
            let store = SqliteVectorStore::connect(&db_path)?;
            commands::execute_sweep(args, &store, &config.janitor, formatter)
        }
        Command::ExportPublish(args) => commands::execute_export_publish(args, formatter),
        command => {
            // The Ollama clients block; they are created and dropped outside the runtime
            let pipeline = Pipeline::connect(config, &db_path)?;
            let runtime = tokio::runtime::Runtime::new()?;

            let result = runtime.block_on(async {
                match command {
                    Command::Questions(args) => commands::execute_questions(args, &pipeline, formatter).await,
                    Command::Answer(args) => commands::execute_answer(args, &pipeline, formatter).await,
                    Command::Run(args) => commands::execute_run(args, &pipeline, formatter).await,
                    Command::Sweep(_) | Command::ExportPublish(_) => Ok(()),
                }
            });

            drop(runtime);
            drop(pipeline);
            result
        }
    }
}
