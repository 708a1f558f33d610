//! Background worker for continuous Janitor operation

use crate::{Janitor, JanitorConfig, JanitorError, JanitorMetrics};
use pageqa_store::VectorStore;
use std::sync::Arc;
use tokio::time::{interval, Duration};

/// Background worker that runs Janitor on a schedule
///
/// # Examples
///
/// ```no_run
/// use pageqa_janitor::{JanitorConfig, JanitorWorker};
/// use pageqa_store::SqliteVectorStore;
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = Arc::new(SqliteVectorStore::connect("pageqa.db")?);
///     let mut worker = JanitorWorker::new(JanitorConfig::default());
///
///     // Run indefinitely (until Ctrl+C)
///     worker.run(store).await?;
///     Ok(())
/// }
/// ```
pub struct JanitorWorker {
    janitor: Janitor,
    interval: Duration,
}

impl JanitorWorker {
    /// Create a new background worker with the given configuration
    pub fn new(config: JanitorConfig) -> Self {
        let interval = config.sweep_interval();
        Self {
            janitor: Janitor::new(config),
            interval,
        }
    }

    /// Create a worker with default configuration
    pub fn default_config() -> Self {
        Self::new(JanitorConfig::default())
    }

    /// Run the worker until a shutdown signal (Ctrl+C) is received
    ///
    /// A failed sweep is logged and the next tick tries again.
    pub async fn run<S: VectorStore + ?Sized>(&mut self, store: Arc<S>) -> Result<(), JanitorError> {
        if self.interval.is_zero() {
            return Err(JanitorError::Config("sweep interval must be greater than 0".to_string()));
        }
        let mut ticker = interval(self.interval);

        tracing::info!("Janitor worker started (interval: {:?})", self.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    tracing::debug!("Starting sweep cycle");

                    match self.janitor.sweep(store.as_ref()) {
                        Ok(report) => {
                            tracing::info!(
                                "Sweep completed: {} removed, {} failed, {} retained",
                                report.removed.len(),
                                report.failed.len(),
                                report.retained.len()
                            );
                        }
                        Err(e) => {
                            tracing::error!("Sweep failed: {}", e);
                        }
                    }
                }
                signal = tokio::signal::ctrl_c() => {
                    if let Err(e) = signal {
                        return Err(JanitorError::Worker(e.to_string()));
                    }
                    tracing::info!("Shutdown signal received, stopping janitor");
                    break;
                }
            }
        }

        tracing::info!("Janitor stopped. Final metrics:\n{}", self.janitor.metrics().summary());
        Ok(())
    }

    /// Run for a specific number of cycles, stopping at the first failed sweep
    pub async fn run_cycles<S: VectorStore + ?Sized>(&mut self, store: Arc<S>, cycles: usize) -> Result<(), JanitorError> {
        if self.interval.is_zero() {
            return Err(JanitorError::Config("sweep interval must be greater than 0".to_string()));
        }
        let mut ticker = interval(self.interval);

        tracing::info!(
            "Janitor worker started for {} cycles (interval: {:?})",
            cycles,
            self.interval
        );

        for cycle in 0..cycles {
            ticker.tick().await;

            tracing::debug!("Starting sweep cycle {}/{}", cycle + 1, cycles);

            match self.janitor.sweep(store.as_ref()) {
                Ok(report) => {
                    tracing::info!(
                        "Sweep {}/{} completed: {} removed, {} failed",
                        cycle + 1,
                        cycles,
                        report.removed.len(),
                        report.failed.len()
                    );
                }
                Err(e) => {
                    tracing::error!("Sweep {}/{} failed: {}", cycle + 1, cycles, e);
                    return Err(e);
                }
            }
        }

        tracing::info!(
            "Janitor finished {} cycles. Final metrics:\n{}",
            cycles,
            self.janitor.metrics().summary()
        );
        Ok(())
    }

    /// Get a reference to the janitor's current metrics
    pub fn metrics(&self) -> &JanitorMetrics {
        self.janitor.metrics()
    }

    /// Reset the janitor's metrics counters
    pub fn reset_metrics(&mut self) {
        self.janitor.reset_metrics();
    }
}
