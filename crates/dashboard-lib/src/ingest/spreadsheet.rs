//! Spreadsheet workbook reader (xlsx, xlsm, xlsb, xls, ods)

use super::{CellValue, RawTable, TabularSource};
use crate::error::{DashboardError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::path::{Path, PathBuf};

/// Largest serial number a spreadsheet can represent (9999-12-31)
const MAX_EXCEL_SERIAL: f64 = 2_958_466.0;

/// Reads the first worksheet of a workbook
pub struct SpreadsheetSource {
    path: PathBuf,
}

impl SpreadsheetSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TabularSource for SpreadsheetSource {
    fn read_table(&self) -> Result<RawTable> {
        let mut workbook = open_workbook_auto(&self.path)?;
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or(DashboardError::EmptyWorkbook)?;
        let range = workbook.worksheet_range(&sheet_name)?;

        let mut rows = range.rows();
        let headers = match rows.next() {
            Some(header_row) => header_row
                .iter()
                .map(|cell| convert_cell(cell).as_text().unwrap_or_default())
                .collect(),
            None => Vec::new(),
        };

        let rows = rows
            .map(|row| row.iter().map(convert_cell).collect())
            .collect();

        Ok(RawTable { headers, rows })
    }

    fn format_name(&self) -> &'static str {
        "spreadsheet"
    }
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Error(_) => CellValue::Empty,
        Data::DateTime(dt) => excel_serial_to_datetime(dt.as_f64())
            .map(CellValue::DateTime)
            .unwrap_or(CellValue::Empty),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

/// Convert a spreadsheet serial date (days since 1899-12-30) to a timestamp
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || !(1.0..MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let days = serial.trunc() as i64;
    let seconds = (serial.fract() * 86_400.0).round() as i64;
    epoch.checked_add_signed(Duration::days(days) + Duration::seconds(seconds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_excel_serial_conversion() {
        // 45000 is 2023-03-15
        let dt = excel_serial_to_datetime(45000.0).unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2023, 3, 15));

        let noon = excel_serial_to_datetime(45000.5).unwrap();
        assert_eq!(noon.format("%H:%M").to_string(), "12:00");
    }

    #[test]
    fn test_excel_serial_out_of_range() {
        assert!(excel_serial_to_datetime(0.0).is_none());
        assert!(excel_serial_to_datetime(-5.0).is_none());
        assert!(excel_serial_to_datetime(f64::NAN).is_none());
        assert!(excel_serial_to_datetime(3_000_000.0).is_none());
    }

    #[test]
    fn test_convert_cell_variants() {
        assert_eq!(convert_cell(&Data::Empty), CellValue::Empty);
        assert_eq!(convert_cell(&Data::Int(8)), CellValue::Number(8.0));
        assert_eq!(
            convert_cell(&Data::String("web01".into())),
            CellValue::Text("web01".into())
        );
    }
}
