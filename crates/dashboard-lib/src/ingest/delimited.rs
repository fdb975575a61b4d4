//! CSV export reader

use super::{CellValue, RawTable, TabularSource};
use crate::error::Result;
use csv::ReaderBuilder;
use std::path::{Path, PathBuf};

/// Reads a comma-separated export with a header row
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TabularSource for CsvSource {
    fn read_table(&self) -> Result<RawTable> {
        // Exports often carry ragged trailing rows (totals, notes)
        let mut reader = ReaderBuilder::new().flexible(true).from_path(&self.path)?;

        let headers = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(
                record
                    .iter()
                    .map(|field| {
                        if field.trim().is_empty() {
                            CellValue::Empty
                        } else {
                            CellValue::Text(field.to_string())
                        }
                    })
                    .collect(),
            );
        }

        Ok(RawTable { headers, rows })
    }

    fn format_name(&self) -> &'static str {
        "csv"
    }
}
