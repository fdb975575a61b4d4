//! Structured logging for pipeline runs
//!
//! Every pipeline stage reports through [`StructuredLogger`] so log lines
//! carry a stable `event` field plus the run's input path.

use crate::aggregate::Snapshot;
use crate::ingest::CleanReport;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Structured logger bound to one input file
pub struct StructuredLogger {
    input: String,
}

impl StructuredLogger {
    pub fn new(input: &Path) -> Self {
        Self {
            input: input.display().to_string(),
        }
    }

    /// Log a successfully read source table
    pub fn log_load(&self, format: &str, rows: usize, columns: usize) {
        info!(
            event = "inventory_loaded",
            input = %self.input,
            format = %format,
            rows = rows,
            columns = columns,
            "Loaded inventory"
        );
    }

    /// Log one cleaning summary per run
    pub fn log_cleaning(&self, report: &CleanReport) {
        debug!(
            event = "inventory_cleaned",
            input = %self.input,
            rows_read = report.rows_read,
            rows_kept = report.rows_kept(),
            dropped_missing_name = report.dropped_missing_name,
            dropped_outliers = report.dropped_outliers,
            undated = report.undated,
            "Cleaned inventory rows"
        );
    }

    /// Log the aggregate snapshot headline numbers
    pub fn log_snapshot(&self, snapshot: &Snapshot) {
        if snapshot.is_empty() {
            warn!(
                event = "snapshot_empty",
                input = %self.input,
                "No VM records survived cleaning; the report will be empty"
            );
            return;
        }

        info!(
            event = "snapshot_built",
            input = %self.input,
            total_vms = snapshot.stats.total_vms,
            total_vcpus = snapshot.stats.total_vcpus,
            total_memory_gb = snapshot.stats.total_memory_gb,
            clusters = snapshot.stats.total_clusters,
            hosts = snapshot.stats.total_hosts,
            waves = snapshot.waves.len(),
            has_trends = snapshot.growth_trends.is_some(),
            "Built inventory snapshot"
        );
    }

    pub fn log_report_written(&self, output: &Path, bytes: u64) {
        info!(
            event = "report_written",
            input = %self.input,
            output = %output.display(),
            bytes = bytes,
            "Wrote dashboard"
        );
    }

    pub fn log_failure(&self, stage: &str, err: &dyn std::error::Error) {
        error!(
            event = "pipeline_failed",
            input = %self.input,
            stage = %stage,
            error = %err,
            "Dashboard generation failed"
        );
    }
}
