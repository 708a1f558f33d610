//! PageQA Janitor
//!
//! Maintenance for vector tables that a rebuild renamed aside instead of
//! dropping.
//!
//! # Overview
//!
//! When an index rebuild cannot drop the old table, it renames it to
//! `<name>__stale_<unix_millis>` and carries on. The Janitor is responsible for:
//! - **Stale table detection**: Finding renamed-aside tables by name
//! - **Garbage collection**: Dropping the ones older than `max_age_secs`
//! - **Metrics collection**: Tracking removed, failed and retained tables
//!
//! # Usage
//!
//! ## One-time Sweep
//!
//! ```no_run
//! use pageqa_janitor::Janitor;
//! use pageqa_store::SqliteVectorStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SqliteVectorStore::connect("pageqa.db")?;
//! let mut janitor = Janitor::default_config();
//!
//! let report = janitor.sweep(&store)?;
//! println!("{:?}", report.removed);
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! ```toml
//! [janitor]
//! max_age_secs = 3600
//! sweep_interval_minutes = 60
//! dry_run = false
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod janitor;
mod metrics;
mod worker;

pub use config::JanitorConfig;
pub use error::JanitorError;
pub use janitor::{Janitor, SweepReport};
pub use metrics::JanitorMetrics;
pub use worker::JanitorWorker;
