//! Tabular ingestion for hypervisor inventory exports
//!
//! This module reads a header row plus data rows from a spreadsheet or CSV
//! export, resolves the many header spellings exports use onto a canonical
//! schema, and cleans the rows into typed [`VmRecord`](crate::models::VmRecord)s.

mod cleaner;
mod columns;
mod delimited;
mod spreadsheet;


pub use cleaner::{
    clean_rows, parse_creation_date, CleanReport, OUTLIER_MULTIPLIER, OUTLIER_QUANTILE,
};
pub use columns::{find_column, ColumnMap, Field};
pub use delimited::CsvSource;
pub use spreadsheet::{excel_serial_to_datetime, SpreadsheetSource};

use crate::error::{DashboardError, Result};
use chrono::NaiveDateTime;
use std::path::Path;

/// A single cell normalized away from the reader library's representation
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Trimmed textual content, `None` when the cell is blank
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            CellValue::Number(n) => Some(format_number(*n)),
            CellValue::Bool(b) => Some(b.to_string()),
            CellValue::DateTime(dt) => Some(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }

    /// Finite numeric content, `None` when the cell is blank or unparseable
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            CellValue::Number(n) => *n,
            CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        value.is_finite().then_some(value)
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Header row plus data rows as read from the source
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

/// Something that can produce a [`RawTable`]
pub trait TabularSource {
    /// Read the header row and all data rows
    fn read_table(&self) -> Result<RawTable>;

    /// Short name of the source format for logging
    fn format_name(&self) -> &'static str;
}

/// Pick a source implementation from the file extension
pub fn open_source(path: &Path) -> Result<Box<dyn TabularSource>> {
    if !path.exists() {
        return Err(DashboardError::InputNotFound(path.to_path_buf()));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Box::new(SpreadsheetSource::new(path))),
        "csv" => Ok(Box::new(CsvSource::new(path))),
        other => Err(DashboardError::UnsupportedFormat(other.to_string())),
    }
}
