//! End-to-end dashboard generation
//!
//! load → resolve columns → clean → classify → aggregate → forecast → render
//! → atomic write. Each stage finishes before the next one starts.

use crate::aggregate::Snapshot;
use crate::classify::classify_all;
use crate::error::Result;
use crate::forecast::Forecast;
use crate::ingest::{clean_rows, open_source, CleanReport, ColumnMap, RawTable};
use crate::observability::StructuredLogger;
use crate::report::{write_atomically, DashboardRenderer, ReportOptions};
use chrono::{Datelike, NaiveDateTime};
use std::path::{Path, PathBuf};

/// What a successful run produced
#[derive(Debug, Clone)]
pub struct ReportSummary {
    pub output: PathBuf,
    pub bytes_written: u64,
    pub cleaning: CleanReport,
    pub snapshot: Snapshot,
    pub forecast: Forecast,
}

/// Read the raw table behind `input`, picking the reader by extension
pub fn load_table(input: &Path) -> Result<RawTable> {
    let source = open_source(input)?;
    let table = source.read_table()?;
    StructuredLogger::new(input).log_load(
        source.format_name(),
        table.rows.len(),
        table.headers.len(),
    );
    Ok(table)
}

/// Turn a raw table into the aggregate snapshot
///
/// Fails only when a required column cannot be resolved.
pub fn process_table(
    table: &RawTable,
    generated_at: NaiveDateTime,
) -> Result<(Snapshot, CleanReport)> {
    let columns = ColumnMap::resolve(&table.headers)?;
    let (records, report) = clean_rows(table, &columns);
    let vms = classify_all(records);
    Ok((Snapshot::build(&vms, generated_at), report))
}

/// Generate the dashboard for `input` and write it to `output`
///
/// Nothing is written unless every stage succeeds.
pub fn generate_dashboard(
    input: &Path,
    output: &Path,
    options: &ReportOptions,
    generated_at: NaiveDateTime,
) -> Result<ReportSummary> {
    let logger = StructuredLogger::new(input);

    let run = || -> Result<ReportSummary> {
        let table = load_table(input)?;
        let (snapshot, cleaning) = process_table(&table, generated_at)?;
        logger.log_cleaning(&cleaning);
        logger.log_snapshot(&snapshot);

        let forecast = Forecast::compute(&snapshot, options.forecast, generated_at.year());
        let html = DashboardRenderer::new()?.render(&snapshot, &forecast, options)?;
        let bytes_written = write_atomically(output, &html)?;
        logger.log_report_written(output, bytes_written);

        Ok(ReportSummary {
            output: output.to_path_buf(),
            bytes_written,
            cleaning,
            snapshot,
            forecast,
        })
    };

    run().map_err(|err| {
        logger.log_failure("generate", &err);
        err
    })
}

/// `<stem>_dashboard.html`, relative to the working directory
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "inventory".to_string());
    PathBuf::from(format!("{stem}_dashboard.html"))
}
