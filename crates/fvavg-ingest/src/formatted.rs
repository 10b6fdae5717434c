//! Formatted-file ingester (§4.1): the file already has `Time, Vol, Flow`
//! columns; read them directly.

use fvavg_core::Recording;
use fvavg_io::{column_f64, Range};

use crate::error::{IngestError, IngestResult};

pub fn ingest_formatted(range: &Range) -> IngestResult<Recording> {
    let time_col = find_exact_column(range, "time").ok_or(IngestError::MissingColumn("Time"))?;
    let vol_col = find_exact_column(range, "vol").ok_or(IngestError::MissingColumn("Vol"))?;
    let flow_col = find_exact_column(range, "flow").ok_or(IngestError::MissingColumn("Flow"))?;

    let t = column_f64(range, time_col, 1);
    let v = column_f64(range, vol_col, 1);
    let f = column_f64(range, flow_col, 1);

    if t.len() != v.len() || t.len() != f.len() {
        return Err(IngestError::ColumnLengthMismatch);
    }

    let dt = detect_period(&t);
    Ok(Recording::new(t, v, f, dt))
}

fn find_exact_column(range: &Range, name: &str) -> Option<u32> {
    let width = range.width() as u32;
    (0..width).find(|&col| {
        range
            .get((0, col as usize))
            .map(|cell| cell.to_string().trim().eq_ignore_ascii_case(name))
            .unwrap_or(false)
    })
}

/// The sampling period is the gap between the first two time samples;
/// typical recordings use 0.01 s (§4.1, §6).
fn detect_period(t: &[f64]) -> f64 {
    if t.len() < 2 {
        0.01
    } else {
        t[1] - t[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{Cell, Data};

    fn sheet() -> Range {
        let mut cells = vec![
            Cell::new((0, 0), Data::String("Time".into())),
            Cell::new((0, 1), Data::String("Vol".into())),
            Cell::new((0, 2), Data::String("Flow".into())),
        ];
        for (row, (t, v, f)) in [(0.01, 0.0, -1.0), (0.02, -0.01, -1.0)].into_iter().enumerate() {
            cells.push(Cell::new((row as u32 + 1, 0), Data::Float(t)));
            cells.push(Cell::new((row as u32 + 1, 1), Data::Float(v)));
            cells.push(Cell::new((row as u32 + 1, 2), Data::Float(f)));
        }
        Range::from_sparse(cells)
    }

    #[test]
    fn reads_named_columns_in_any_order() {
        let rec = ingest_formatted(&sheet()).expect("formatted ingest");
        assert_eq!(rec.t, vec![0.01, 0.02]);
        assert_eq!(rec.f, vec![-1.0, -1.0]);
        assert!((rec.dt - 0.01).abs() < 1e-12);
    }
}
