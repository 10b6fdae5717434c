//! A single-subject percent-TLC table, written alongside the cross-subject
//! one rather than in place of it.

use std::path::Path;

use fvavg_core::FvavgError;
use fvavg_io::WorkbookWriter;

use crate::percent::to_percent_tlc;
use crate::subject::SubjectLoop;

pub fn write_single_subject_table(
    loop_: &SubjectLoop,
    tlc: f64,
    path: &Path,
) -> Result<(), FvavgError> {
    let vol_pct = to_percent_tlc(&loop_.vol, tlc);

    let mut writer = WorkbookWriter::new();
    let idx = writer
        .add_sheet("Data")
        .map_err(|e| FvavgError::Write(e.to_string()))?;

    let flow_header = format!("Flow {}", loop_.id);
    let next_row = writer
        .write_columns(
            idx,
            0,
            &[("Vol % TLC", vol_pct.as_slice()), (&flow_header, loop_.flow.as_slice())],
        )
        .map_err(|e| FvavgError::Write(e.to_string()))?;

    writer
        .write_labeled_values(idx, next_row + 1, &[("TLC", tlc)])
        .map_err(|e| FvavgError::Write(e.to_string()))?;

    writer.save(path).map_err(|e| FvavgError::Write(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn percent_tlc_matches_constant_volume() {
        let loop_ = SubjectLoop {
            id: "12345".to_string(),
            vol: vec![3.0, 3.0],
            flow: vec![0.0, 0.0],
        };
        let pct = to_percent_tlc(&loop_.vol, 6.0);
        assert_relative_eq!(pct[0], 50.0, epsilon = 1e-9);
    }
}
