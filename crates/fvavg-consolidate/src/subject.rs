//! Reads one already-processed FVAvg output file's averaged loop (§6,
//! "Input file, FVAvg-processed form").

use std::path::Path;

use fvavg_io::{column_f64, find_column, WorkbookReader};
use log::debug;

use crate::error::{ConsolidateError, ConsolidateResult};

const SHEET: &str = "Avg Vol Bin Data";

/// One subject's averaged flow-volume loop: inspiration concatenated with
/// expiration, in absolute liters (not yet rescaled to percent-TLC).
#[derive(Debug, Clone)]
pub struct SubjectLoop {
    pub id: String,
    pub vol: Vec<f64>,
    pub flow: Vec<f64>,
}

pub fn read_subject_loop(path: &Path, id: &str) -> ConsolidateResult<SubjectLoop> {
    let file = path.display().to_string();
    let mut reader = WorkbookReader::open(path)?;
    let range = reader.sheet_or_first(SHEET)?;

    let insp_vol_col = find_column(&range, 0, &["insp", "vol"]).ok_or_else(|| {
        ConsolidateError::MissingColumn {
            file: file.clone(),
            which: "insp vol",
        }
    })?;
    let insp_flow_col = find_column(&range, 0, &["insp", "flow"]).ok_or_else(|| {
        ConsolidateError::MissingColumn {
            file: file.clone(),
            which: "insp flow",
        }
    })?;
    let exp_vol_col = find_column(&range, 0, &["exp", "vol"]).ok_or_else(|| {
        ConsolidateError::MissingColumn {
            file: file.clone(),
            which: "exp vol",
        }
    })?;
    let exp_flow_col = find_column(&range, 0, &["exp", "flow"]).ok_or_else(|| {
        ConsolidateError::MissingColumn {
            file: file.clone(),
            which: "exp flow",
        }
    })?;

    let mut vol = column_f64(&range, insp_vol_col, 1);
    vol.extend(column_f64(&range, exp_vol_col, 1));
    let mut flow = column_f64(&range, insp_flow_col, 1);
    flow.extend(column_f64(&range, exp_flow_col, 1));

    debug!("read subject loop {} from {} ({} points)", id, file, vol.len());

    Ok(SubjectLoop {
        id: id.to_string(),
        vol,
        flow,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_column_names_the_file_and_which() {
        let err = ConsolidateError::MissingColumn {
            file: "subject_12345.xlsx".to_string(),
            which: "insp vol",
        };
        assert!(err.to_string().contains("subject_12345.xlsx"));
        assert!(err.to_string().contains("insp vol"));
    }
}
