//! Writing multi-sheet output workbooks.

use std::path::Path;

use log::debug;
use rust_xlsxwriter::Workbook;

use crate::error::{IoError, IoResult};

/// An output workbook under construction. Sheets are appended in the
/// order callers add them, matching the fixed sheet order §6 requires.
pub struct WorkbookWriter {
    workbook: Workbook,
    sheet_names: Vec<String>,
}

impl WorkbookWriter {
    pub fn new() -> Self {
        Self {
            workbook: Workbook::new(),
            sheet_names: Vec::new(),
        }
    }

    /// Start a new sheet, returning its index for later writes.
    pub fn add_sheet(&mut self, name: &str) -> IoResult<usize> {
        let sheet = self.workbook.add_worksheet();
        sheet
            .set_name(name)
            .map_err(|e| IoError::Write(name.to_string(), e.to_string()))?;
        self.sheet_names.push(name.to_string());
        Ok(self.sheet_names.len() - 1)
    }

    /// Write a header row plus stacked numeric columns beneath it,
    /// starting at `start_row`. Columns shorter than the tallest one are
    /// left blank past their last value. Returns the first unused row.
    pub fn write_columns(
        &mut self,
        sheet_idx: usize,
        start_row: u32,
        columns: &[(&str, &[f64])],
    ) -> IoResult<u32> {
        let name = self.sheet_names[sheet_idx].clone();
        let sheet = self
            .workbook
            .worksheet_from_index(sheet_idx)
            .map_err(|e| IoError::Write(name.clone(), e.to_string()))?;

        for (col, (header, _)) in columns.iter().enumerate() {
            sheet
                .write(start_row, col as u16, *header)
                .map_err(|e| IoError::Write(name.clone(), e.to_string()))?;
        }

        let max_len = columns.iter().map(|(_, v)| v.len()).max().unwrap_or(0);
        for row in 0..max_len {
            for (col, (_, values)) in columns.iter().enumerate() {
                if let Some(v) = values.get(row).copied().filter(|v| v.is_finite()) {
                    sheet
                        .write(start_row + 1 + row as u32, col as u16, v)
                        .map_err(|e| IoError::Write(name.clone(), e.to_string()))?;
                }
            }
        }

        Ok(start_row + 1 + max_len as u32)
    }

    /// Write a block of label/value annotation rows (e.g. a TLC summary
    /// appended below a data table, §6).
    pub fn write_labeled_values(
        &mut self,
        sheet_idx: usize,
        start_row: u32,
        rows: &[(&str, f64)],
    ) -> IoResult<u32> {
        let name = self.sheet_names[sheet_idx].clone();
        let sheet = self
            .workbook
            .worksheet_from_index(sheet_idx)
            .map_err(|e| IoError::Write(name.clone(), e.to_string()))?;

        for (i, (label, value)) in rows.iter().enumerate() {
            let row = start_row + i as u32;
            sheet
                .write(row, 0, *label)
                .map_err(|e| IoError::Write(name.clone(), e.to_string()))?;
            sheet
                .write(row, 1, *value)
                .map_err(|e| IoError::Write(name.clone(), e.to_string()))?;
        }

        Ok(start_row + rows.len() as u32)
    }

    pub fn save(mut self, path: &Path) -> IoResult<()> {
        self.workbook
            .save(path)
            .map_err(|e| IoError::Write(path.display().to_string(), e.to_string()))?;
        debug!("wrote workbook {} ({} sheets)", path.display(), self.sheet_names.len());
        Ok(())
    }
}

impl Default for WorkbookWriter {
    fn default() -> Self {
        Self::new()
    }
}
