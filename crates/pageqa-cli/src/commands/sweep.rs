//! Sweep command implementation.

use crate::cli::SweepArgs;
use crate::error::Result;
use crate::output::Formatter;
use crate::pipeline::sweep_store;
use pageqa_janitor::JanitorConfig;
use pageqa_store::SqliteVectorStore;

/// Execute the sweep command.
pub fn execute_sweep(
    args: SweepArgs,
    store: &SqliteVectorStore,
    config: &JanitorConfig,
    formatter: &Formatter,
) -> Result<()> {
    let report = sweep_store(store, config, args.max_age_secs, args.dry_run)?;
    println!("{}", formatter.sweep_report(&report));

    let verb = if report.dry_run { "Would remove" } else { "Removed" };
    let message = format!("{} {} stale table(s)", verb, report.removed.len());
    if report.failed.is_empty() {
        println!("{}", formatter.success(&message));
    } else {
        println!("{}", formatter.warning(&format!("{}, {} failed", message, report.failed.len())));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pageqa_domain::{Chunk, EmbeddedChunk};
    use pageqa_store::{stale_table_name, VectorStore};

    fn store_with_stale_table() -> (SqliteVectorStore, String) {
        let store = SqliteVectorStore::connect(":memory:").unwrap();
        let rows = vec![EmbeddedChunk::new(Chunk::new("text", "doc.pdf", 1), vec![1.0, 0.0])];
        let stale = stale_table_name("pdf_pages", 1);
        store.create_table(&stale, 2, &rows).unwrap();
        store.create_table("pdf_pages", 2, &rows).unwrap();
        (store, stale)
    }

    #[test]
    fn test_sweep_removes_old_stale_tables() {
        let (store, stale) = store_with_stale_table();
        let args = SweepArgs {
            max_age_secs: Some(0),
            dry_run: false,
        };
        execute_sweep(args, &store, &JanitorConfig::default(), &Formatter::new(false)).unwrap();

        assert!(!store.table_exists(&stale).unwrap());
        assert!(store.table_exists("pdf_pages").unwrap());
    }

    #[test]
    fn test_dry_run_keeps_tables() {
        let (store, stale) = store_with_stale_table();
        let args = SweepArgs {
            max_age_secs: Some(0),
            dry_run: true,
        };
        execute_sweep(args, &store, &JanitorConfig::default(), &Formatter::new(false)).unwrap();

        assert!(store.table_exists(&stale).unwrap());
    }
}
