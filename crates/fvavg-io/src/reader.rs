//! Reading workbook sheets and locating columns within them.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use log::debug;

use crate::error::{IoError, IoResult};
use crate::Range;

/// A handle on an opened workbook. Cheap to keep around for the lifetime
/// of one ingest call; not meant to be shared across files.
pub struct WorkbookReader {
    sheets: Sheets<std::io::BufReader<std::fs::File>>,
}

impl WorkbookReader {
    pub fn open(path: &Path) -> IoResult<Self> {
        let sheets = open_workbook_auto(path)
            .map_err(|e| IoError::Open(path.display().to_string(), e.to_string()))?;
        debug!("opened workbook {}", path.display());
        Ok(Self { sheets })
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names()
    }

    /// Read a sheet by exact name.
    pub fn sheet(&mut self, name: &str) -> IoResult<Range> {
        self.sheets
            .worksheet_range(name)
            .map_err(|e| IoError::Sheet(name.to_string(), e.to_string()))
    }

    /// Read `preferred` if present, otherwise fall back to the workbook's
    /// first sheet (§4.1 formatted-ingest / §6 FVAvg-processed-form
    /// fallback behavior).
    pub fn sheet_or_first(&mut self, preferred: &str) -> IoResult<Range> {
        let names = self.sheet_names();
        let target = if names.iter().any(|n| n == preferred) {
            preferred.to_string()
        } else {
            names.into_iter().next().ok_or(IoError::NoSheets)?
        };
        self.sheet(&target)
    }
}

/// Find a column whose header (row 0) contains every pattern in
/// `patterns`, case-insensitively, as a substring. Column order is not
/// assumed (§6).
pub fn find_column(range: &Range, header_row: u32, patterns: &[&str]) -> Option<u32> {
    let patterns: Vec<String> = patterns.iter().map(|p| p.to_lowercase()).collect();
    let width = range.width() as u32;
    'cols: for col in 0..width {
        let Some(cell) = range.get((header_row as usize, col as usize)) else {
            continue;
        };
        let header = cell.to_string().to_lowercase();
        for p in &patterns {
            if !header.contains(p.as_str()) {
                continue 'cols;
            }
        }
        return Some(col);
    }
    None
}

/// Collect a column's numeric values starting at `start_row`, skipping
/// rows that aren't parseable as a number rather than failing outright.
pub fn column_f64(range: &Range, col: u32, start_row: u32) -> Vec<f64> {
    let height = range.height() as u32;
    (start_row..height)
        .filter_map(|row| {
            range
                .get((row as usize, col as usize))
                .and_then(Data::as_f64)
        })
        .collect()
}

/// The raw first-column cells, top to bottom, for marker-driven scanning
/// (the raw-ingest path, §4.1).
pub fn first_column(range: &Range) -> Vec<Data> {
    let height = range.height();
    (0..height)
        .map(|row| {
            range
                .get((row, 0))
                .cloned()
                .unwrap_or(Data::Empty)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::WorkbookWriter;

    #[test]
    fn round_trips_columns_written_by_the_writer() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("round_trip.xlsx");

        let mut writer = WorkbookWriter::new();
        let idx = writer.add_sheet("Data").expect("add_sheet");
        writer
            .write_columns(idx, 0, &[("Vol", &[1.0, 2.0, 3.0]), ("Flow", &[-1.0, -2.0, -3.0])])
            .expect("write_columns");
        writer.save(&path).expect("save");

        let mut reader = WorkbookReader::open(&path).expect("open");
        assert_eq!(reader.sheet_names(), vec!["Data".to_string()]);
        let range = reader.sheet("Data").expect("sheet");

        let vol_col = find_column(&range, 0, &["vol"]).expect("vol column");
        let flow_col = find_column(&range, 0, &["flow"]).expect("flow column");
        assert_eq!(column_f64(&range, vol_col, 1), vec![1.0, 2.0, 3.0]);
        assert_eq!(column_f64(&range, flow_col, 1), vec![-1.0, -2.0, -3.0]);
    }
}
