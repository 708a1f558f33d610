//! Output formatting for the CLI.

use pageqa_domain::UnitFailure;
use pageqa_extractor::QuestionBatchReport;
use pageqa_indexer::IndexHandle;
use pageqa_janitor::SweepReport;
use pageqa_synthesizer::AnswerBatchReport;
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// Summary table of a question-generation run.
    pub fn question_report(&self, report: &QuestionBatchReport) -> String {
        let mut rows = vec![
            ("Questions", report.questions.len().to_string()),
            ("Pages kept", report.pages.len().to_string()),
            ("Pages with questions", report.processed_pages.to_string()),
            ("Documents ok", report.documents_succeeded.to_string()),
            ("Documents failed", report.document_failures.len().to_string()),
            ("Page failures", report.page_failures.len().to_string()),
        ];
        if report.aborted {
            rows.push(("Documents skipped", report.documents_skipped.to_string()));
        }
        self.key_value_table(&rows)
    }

    /// Summary table of an index build.
    pub fn index_handle(&self, handle: &IndexHandle) -> String {
        self.key_value_table(&[
            ("Table", handle.table_name.clone()),
            ("Rows", handle.rows.to_string()),
            ("Dimension", handle.dimension.to_string()),
            ("Indexed", if handle.indexed { "yes" } else { "no (linear scan)" }.to_string()),
        ])
    }

    /// Summary table of an answer batch.
    pub fn answer_report(&self, report: &AnswerBatchReport) -> String {
        self.key_value_table(&[
            ("Grounded pairs", report.pairs.len().to_string()),
            ("Ungrounded", report.ungrounded.len().to_string()),
            ("Failed", report.failures.len().to_string()),
        ])
    }

    /// Table of a sweep's removed, retained and failed tables.
    pub fn sweep_report(&self, report: &SweepReport) -> String {
        if report.removed.is_empty() && report.retained.is_empty() && report.failed.is_empty() {
            return self.colorize("No stale tables found.", "yellow");
        }

        let removed = if report.dry_run { "would remove" } else { "removed" };
        let mut builder = Builder::default();
        builder.push_record(["Table", "Status"]);
        for name in &report.removed {
            builder.push_record([name.as_str(), removed]);
        }
        for name in &report.retained {
            builder.push_record([name.as_str(), "retained"]);
        }
        for (name, error) in &report.failed {
            builder.push_record([name.clone(), format!("failed: {}", error)]);
        }
        Self::render(builder)
    }

    /// Table of failed units, if any.
    pub fn failures(&self, failures: &[UnitFailure]) -> Option<String> {
        if failures.is_empty() {
            return None;
        }

        let mut builder = Builder::default();
        builder.push_record(["Source", "Page", "Question", "Reason"]);
        for failure in failures {
            builder.push_record([
                failure.source.clone(),
                failure.page.map(|p| p.to_string()).unwrap_or_default(),
                failure.question.clone().unwrap_or_default(),
                failure.reason.clone(),
            ]);
        }
        Some(Self::render(builder))
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn key_value_table(&self, rows: &[(&str, String)]) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Metric", "Value"]);
        for (key, value) in rows {
            builder.push_record([key.to_string(), value.clone()]);
        }
        Self::render(builder)
    }

    fn render(builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}
