//! Core Janitor implementation for stale table cleanup

use crate::{JanitorConfig, JanitorError, JanitorMetrics};
use pageqa_store::{now_millis, parse_stale_table_name, StoreError, VectorStore};
use std::time::Instant;
use tracing::{debug, info, warn};

/// What one sweep did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Stale tables dropped (or, in dry-run mode, that would be dropped)
    pub removed: Vec<String>,

    /// Stale tables that failed to drop, with the error
    pub failed: Vec<(String, String)>,

    /// Stale tables kept because they are younger than the threshold
    pub retained: Vec<String>,

    /// Whether this was a dry run
    pub dry_run: bool,
}

/// Janitor service for renamed-aside vector tables
///
/// A rebuild that cannot drop the old table renames it to
/// `<name>__stale_<unix_millis>`. The janitor finds those tables and drops
/// the ones older than `max_age_secs`. Live tables are never touched.
///
/// # Examples
///
/// ```no_run
/// use pageqa_janitor::Janitor;
/// use pageqa_store::SqliteVectorStore;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = SqliteVectorStore::connect("pageqa.db")?;
/// let mut janitor = Janitor::default_config();
///
/// let report = janitor.sweep(&store)?;
/// println!("removed {} stale tables", report.removed.len());
/// println!("{}", janitor.metrics().summary());
/// # Ok(())
/// # }
/// ```
pub struct Janitor {
    config: JanitorConfig,
    metrics: JanitorMetrics,
}

impl Janitor {
    /// Create a new Janitor with the given configuration
    pub fn new(config: JanitorConfig) -> Self {
        Self {
            config,
            metrics: JanitorMetrics::new(),
        }
    }

    /// Create a Janitor with default configuration
    pub fn default_config() -> Self {
        Self::new(JanitorConfig::default())
    }

    /// Configuration in use
    pub fn config(&self) -> &JanitorConfig {
        &self.config
    }

    /// Get a reference to the current metrics
    pub fn metrics(&self) -> &JanitorMetrics {
        &self.metrics
    }

    /// Reset metrics counters
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    /// Sweep stale tables older than the configured age
    pub fn sweep<S: VectorStore + ?Sized>(&mut self, store: &S) -> Result<SweepReport, JanitorError> {
        self.sweep_at(store, now_millis())
    }

    /// Sweep as if the current time were `now_ms`
    ///
    /// Only listing the tables can fail the sweep. A table that fails to drop
    /// is reported and the sweep moves on.
    pub fn sweep_at<S: VectorStore + ?Sized>(&mut self, store: &S, now_ms: u64) -> Result<SweepReport, JanitorError> {
        let start = Instant::now();
        let max_age_ms = self.config.max_age_secs.saturating_mul(1000);
        let mut report = SweepReport {
            dry_run: self.config.dry_run,
            ..SweepReport::default()
        };

        for table in store.list_tables()? {
            let Some((base, renamed_at)) = parse_stale_table_name(&table.name) else {
                continue;
            };

            let age_ms = now_ms.saturating_sub(renamed_at);
            if age_ms < max_age_ms {
                debug!(table = %table.name, age_ms, "Stale table is too young to sweep");
                report.retained.push(table.name);
                continue;
            }

            if self.config.dry_run {
                info!(table = %table.name, base, "DRY RUN: Would drop stale table");
                report.removed.push(table.name);
                continue;
            }

            match store.drop_table(&table.name) {
                // Already gone counts as swept
                Ok(()) | Err(StoreError::NotFound(_)) => {
                    info!(table = %table.name, base, age_ms, "Dropped stale table");
                    report.removed.push(table.name);
                }
                Err(e) => {
                    warn!(table = %table.name, error = %e, "Failed to drop stale table");
                    report.failed.push((table.name, e.to_string()));
                }
            }
        }

        if !self.config.dry_run {
            self.metrics.record_removed(report.removed.len());
        }
        self.metrics.record_failed(report.failed.len());
        self.metrics.record_retained(report.retained.len());
        self.metrics.record_sweep();
        self.metrics.total_runtime_ms += start.elapsed().as_millis() as u64;

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pageqa_store::{stale_table_name, SqliteVectorStore};

    const NOW: u64 = 1_700_000_000_000;
    const HOUR_MS: u64 = 3_600_000;

    fn store_with(names: &[String]) -> SqliteVectorStore {
        let store = SqliteVectorStore::connect(":memory:").unwrap();
        for name in names {
            store.create_table(name, 4, &[]).unwrap();
        }
        store
    }

    fn names(store: &SqliteVectorStore) -> Vec<String> {
        store.list_tables().unwrap().into_iter().map(|t| t.name).collect()
    }

    #[test]
    fn test_janitor_creation() {
        let janitor = Janitor::default_config();
        assert_eq!(janitor.metrics().sweep_count, 0);
        assert_eq!(janitor.metrics().tables_removed, 0);
    }

    #[test]
    fn test_sweeps_only_old_stale_tables() {
        let old = stale_table_name("pdf_pages", NOW - 2 * HOUR_MS);
        let young = stale_table_name("pdf_pages", NOW - 60_000);
        let store = store_with(&["pdf_pages".to_string(), old.clone(), young.clone()]);
        let mut janitor = Janitor::default_config();

        let report = janitor.sweep_at(&store, NOW).unwrap();

        assert_eq!(report.removed, vec![old]);
        assert_eq!(report.retained, vec![young.clone()]);
        assert!(report.failed.is_empty());
        assert_eq!(names(&store), vec!["pdf_pages".to_string(), young]);
        assert_eq!(janitor.metrics().tables_removed, 1);
    }

    #[test]
    fn test_live_tables_are_never_swept() {
        let store = store_with(&["pdf_pages".to_string(), "notes__stale_x".to_string()]);
        let mut janitor = Janitor::new(JanitorConfig {
            max_age_secs: 0,
            ..JanitorConfig::default()
        });

        let report = janitor.sweep_at(&store, NOW).unwrap();
        assert!(report.removed.is_empty());
        assert_eq!(names(&store).len(), 2);
    }

    #[test]
    fn test_sweep_respects_dry_run() {
        let old = stale_table_name("pdf_pages", NOW - 2 * HOUR_MS);
        let store = store_with(&[old.clone()]);
        let mut janitor = Janitor::new(JanitorConfig {
            dry_run: true,
            ..JanitorConfig::default()
        });

        let report = janitor.sweep_at(&store, NOW).unwrap();

        assert!(report.dry_run);
        assert_eq!(report.removed, vec![old.clone()]);
        assert_eq!(names(&store), vec![old]);
        assert_eq!(janitor.metrics().tables_removed, 0);
        assert_eq!(janitor.metrics().sweep_count, 1);
    }

    #[test]
    fn test_zero_age_sweeps_everything_stale() {
        let store = store_with(&[stale_table_name("a", NOW), stale_table_name("b", NOW - 1)]);
        let mut janitor = Janitor::new(JanitorConfig {
            max_age_secs: 0,
            ..JanitorConfig::default()
        });

        assert_eq!(janitor.sweep_at(&store, NOW).unwrap().removed.len(), 2);
        assert!(names(&store).is_empty());
    }

    #[test]
    fn test_metrics_reset() {
        let store = store_with(&[stale_table_name("a", 0)]);
        let mut janitor = Janitor::default_config();
        janitor.sweep_at(&store, NOW).unwrap();
        assert_eq!(janitor.metrics().sweep_count, 1);

        janitor.reset_metrics();
        assert_eq!(janitor.metrics(), &JanitorMetrics::default());
    }
}
