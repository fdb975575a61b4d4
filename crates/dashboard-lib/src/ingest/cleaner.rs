//! Row cleaning and type coercion
//!
//! Turns raw rows into [`VmRecord`]s:
//! 1. drop rows without a VM name (blank lines, section headers)
//! 2. drop memory outliers above `OUTLIER_MULTIPLIER` × p99 (spreadsheet total rows)
//! 3. coerce memory and vCPUs to non-negative integers, unparseable → 0
//! 4. coerce storage to non-negative floats, unparseable → 0
//!
//! Values above [`MAX_CELL_VALUE`] count as unparseable.
//! 5. parse the creation date, unparseable → absent
//!
//! The outlier filter is a heuristic. It reliably removes a "Total" row that
//! sums a few hundred VMs, but it can also remove a genuine VM if the
//! inventory is tiny and wildly skewed.

use super::{excel_serial_to_datetime, CellValue, ColumnMap, Field, RawTable};
use crate::models::{PowerStatus, VmRecord, UNKNOWN_LABEL};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Quantile of memory used as the outlier reference point
pub const OUTLIER_QUANTILE: f64 = 0.99;

/// Rows with memory above this multiple of the reference quantile are dropped
pub const OUTLIER_MULTIPLIER: f64 = 10.0;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%d.%m.%Y"];

/// Counts describing what cleaning did to the input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub rows_read: usize,
    pub dropped_missing_name: usize,
    pub dropped_outliers: usize,
    pub undated: usize,
}

impl CleanReport {
    pub fn rows_kept(&self) -> usize {
        self.rows_read - self.dropped_missing_name - self.dropped_outliers
    }
}

/// Clean every row of `table` using the resolved `columns`
pub fn clean_rows(table: &RawTable, columns: &ColumnMap) -> (Vec<VmRecord>, CleanReport) {
    let mut report = CleanReport {
        rows_read: table.rows.len(),
        ..Default::default()
    };

    let named: Vec<(String, &Vec<CellValue>)> = table
        .rows
        .iter()
        .filter_map(|row| {
            columns
                .cell(row, Field::VmName)
                .as_text()
                .map(|name| (name, row))
        })
        .collect();
    report.dropped_missing_name = report.rows_read - named.len();

    let kept = suppress_memory_outliers(named, columns);
    report.dropped_outliers = report.rows_read - report.dropped_missing_name - kept.len();

    let records: Vec<VmRecord> = kept
        .into_iter()
        .map(|(name, row)| build_record(name, row, columns))
        .collect();
    report.undated = records.iter().filter(|r| r.creation_date.is_none()).count();

    (records, report)
}

fn suppress_memory_outliers<'a>(
    rows: Vec<(String, &'a Vec<CellValue>)>,
    columns: &ColumnMap,
) -> Vec<(String, &'a Vec<CellValue>)> {
    if rows.len() < 2 {
        return rows;
    }

    let memory: Vec<f64> = rows
        .iter()
        .filter_map(|(_, row)| columns.cell(row, Field::MemSizeGb).as_number())
        .collect();
    let Some(reference) = quantile(&memory, OUTLIER_QUANTILE) else {
        return rows;
    };
    let threshold = reference * OUTLIER_MULTIPLIER;

    rows.into_iter()
        .filter(|(_, row)| {
            columns
                .cell(row, Field::MemSizeGb)
                .as_number()
                .map_or(true, |mem| mem <= threshold)
        })
        .collect()
}

/// Linear-interpolated quantile, `None` for an empty slice
pub(crate) fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64))
}

fn build_record(name: String, row: &[CellValue], columns: &ColumnMap) -> VmRecord {
    let text_or_unknown = |field| {
        columns
            .cell(row, field)
            .as_text()
            .unwrap_or_else(|| UNKNOWN_LABEL.to_string())
    };

    VmRecord {
        name,
        cluster: text_or_unknown(Field::ClusterName),
        host: text_or_unknown(Field::VmHost),
        storage_pool: text_or_unknown(Field::StoragePoolName),
        guest_os: columns.cell(row, Field::GuestOs).as_text(),
        status: columns
            .cell(row, Field::Status)
            .as_text()
            .map(|s| PowerStatus::parse(&s))
            .unwrap_or(PowerStatus::Unknown),
        memory_gb: coerce_count(columns.cell(row, Field::MemSizeGb)),
        vcpus: coerce_count(columns.cell(row, Field::NumOfCpus)).min(u32::MAX as u64) as u32,
        storage_provisioned_gb: coerce_size(columns.cell(row, Field::StorageSizeGb)),
        storage_used_gb: coerce_size(columns.cell(row, Field::UsedSizeGb)),
        creation_date: parse_creation_date(columns.cell(row, Field::CreationDate)),
    }
}

/// Numbers above this are treated as unparseable
pub const MAX_CELL_VALUE: f64 = u32::MAX as f64;

fn plausible_number(cell: &CellValue) -> Option<f64> {
    cell.as_number().filter(|n| *n <= MAX_CELL_VALUE)
}

/// Truncate toward zero, clamp negatives and garbage to 0
fn coerce_count(cell: &CellValue) -> u64 {
    plausible_number(cell)
        .map(|n| n.max(0.0).trunc() as u64)
        .unwrap_or(0)
}

fn coerce_size(cell: &CellValue) -> f64 {
    plausible_number(cell).map(|n| n.max(0.0)).unwrap_or(0.0)
}

/// Parse a creation date cell, `None` when it cannot be interpreted
pub fn parse_creation_date(cell: &CellValue) -> Option<NaiveDateTime> {
    match cell {
        CellValue::DateTime(dt) => Some(*dt),
        CellValue::Number(serial) => excel_serial_to_datetime(*serial),
        CellValue::Text(s) => parse_date_text(s.trim()),
        CellValue::Empty | CellValue::Bool(_) => None,
    }
}

fn parse_date_text(s: &str) -> Option<NaiveDateTime> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
