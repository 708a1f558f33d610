//! Metrics collection for Janitor operations

/// Metrics collected across sweeps
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JanitorMetrics {
    /// Stale tables dropped
    pub tables_removed: usize,

    /// Stale tables that could not be dropped
    pub tables_failed: usize,

    /// Stale tables younger than the age threshold
    pub tables_retained: usize,

    /// Total sweep iterations completed
    pub sweep_count: usize,

    /// Total runtime in milliseconds
    pub total_runtime_ms: u64,
}

impl JanitorMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record dropped tables
    pub fn record_removed(&mut self, count: usize) {
        self.tables_removed += count;
    }

    /// Record tables that failed to drop
    pub fn record_failed(&mut self, count: usize) {
        self.tables_failed += count;
    }

    /// Record tables kept because they are too young
    pub fn record_retained(&mut self, count: usize) {
        self.tables_retained += count;
    }

    /// Record a sweep cycle completion
    pub fn record_sweep(&mut self) {
        self.sweep_count += 1;
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        [
            "Janitor Metrics Summary".to_string(),
            "======================".to_string(),
            format!("Sweep cycles: {}", self.sweep_count),
            format!("Total runtime: {}ms", self.total_runtime_ms),
            format!("Stale tables removed: {}", self.tables_removed),
            format!("Stale tables failed: {}", self.tables_failed),
            format!("Stale tables retained: {}", self.tables_retained),
        ]
        .join("\n")
    }
}
