//! Raw-file ingester (§4.1): linear scan of column A for marker-delimited
//! flow and volume blocks.

use fvavg_core::Recording;
use fvavg_io::{first_column, Data, Range};

use crate::error::{IngestError, IngestResult};

/// The synthesized sampling period when a raw file carries no time column.
const SYNTHETIC_PERIOD_S: f64 = 0.01;

pub fn ingest_raw(range: &Range) -> IngestResult<Recording> {
    let cells = first_column(range);

    let mut flow = Vec::new();
    let mut vol = Vec::new();

    let mut collecting_flow = false;
    let mut collecting_vol = false;
    let mut skip_next_flow = false;
    let mut skip_next_vol = false;

    for cell in &cells {
        let text = cell.to_string();
        let trimmed = text.trim();
        let lower = trimmed.to_lowercase();

        if !collecting_flow && lower.contains("ltr/s") {
            collecting_flow = true;
            skip_next_flow = true;
            continue;
        }
        if !collecting_vol && lower == "ltr" {
            collecting_vol = true;
            skip_next_vol = true;
            continue;
        }

        if skip_next_flow {
            skip_next_flow = false;
            continue;
        }
        if skip_next_vol {
            skip_next_vol = false;
            continue;
        }

        if collecting_flow {
            if trimmed.is_empty() {
                collecting_flow = false;
            } else if let Some(v) = numeric_value(cell) {
                flow.push(v);
            }
        }
        if collecting_vol {
            if trimmed.is_empty() {
                collecting_vol = false;
            } else if let Some(v) = numeric_value(cell) {
                vol.push(v);
            }
        }
    }

    if flow.is_empty() && vol.is_empty() {
        return Err(IngestError::NoColumns);
    }

    let n = flow.len().max(vol.len());
    flow.resize(n, f64::NAN);
    vol.resize(n, f64::NAN);
    let t: Vec<f64> = (0..n)
        .map(|k| SYNTHETIC_PERIOD_S * (k as f64 + 1.0))
        .collect();

    Ok(Recording::new(t, vol, flow, SYNTHETIC_PERIOD_S))
}

/// Parse a cell as a number, trying calamine's own coercion first and
/// falling back to the cell's text (covers numbers stored as text, which
/// spreadsheets produced by other tools do often enough).
fn numeric_value(cell: &Data) -> Option<f64> {
    cell.as_f64()
        .or_else(|| cell.to_string().trim().parse::<f64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{Data, Range};

    fn column(values: &[&str]) -> Range<Data> {
        let cells: Vec<Data> = values.iter().map(|v| Data::String(v.to_string())).collect();
        Range::from_sparse(
            cells
                .into_iter()
                .enumerate()
                .map(|(row, cell)| calamine::Cell::new((row as u32, 0), cell))
                .collect(),
        )
    }

    #[test]
    fn collects_two_runs_and_pads_shorter_with_nan() {
        let range = column(&[
            "Ltr/s", "header", "-1.0", "-2.0", "", "Ltr", "header", "1.0", "",
        ]);
        let rec = ingest_raw(&range).expect("raw ingest");
        assert_eq!(rec.f, vec![-1.0, -2.0]);
        assert_eq!(rec.v.len(), 2);
        assert_eq!(rec.v[0], 1.0);
        assert!(rec.v[1].is_nan());
        assert_eq!(rec.t, vec![0.01, 0.02]);
    }

    #[test]
    fn no_markers_is_an_error() {
        let range = column(&["a", "b", "c"]);
        assert!(matches!(ingest_raw(&range), Err(IngestError::NoColumns)));
    }
}
