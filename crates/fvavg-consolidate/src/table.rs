//! Builds the cross-subject side-by-side table (§4.7): per-subject
//! percent-TLC volume and flow columns, row-wise averages, and absolute
//! volume / flow standard deviations recovered via the mean TLC.

use crate::percent::{from_percent_tlc, to_percent_tlc};
use crate::subject::SubjectLoop;

/// One subject's contribution to the table, already rescaled to percent-TLC
/// but not yet padded to the table's common row count.
pub struct SubjectColumn {
    pub id: String,
    pub tlc: f64,
    pub vol_pct: Vec<f64>,
    pub raw_vol: Vec<f64>,
    pub flow: Vec<f64>,
}

impl SubjectColumn {
    pub fn from_loop(loop_: &SubjectLoop, tlc: f64) -> Self {
        Self {
            id: loop_.id.clone(),
            tlc,
            vol_pct: to_percent_tlc(&loop_.vol, tlc),
            raw_vol: loop_.vol.clone(),
            flow: loop_.flow.clone(),
        }
    }
}

pub struct CrossSubjectTable {
    pub ids: Vec<String>,
    pub rows: usize,
    pub mean_tlc: f64,
    /// Per subject, percent-TLC volume padded with `NaN` to `rows`.
    pub vol_pct: Vec<Vec<f64>>,
    pub raw_vol: Vec<Vec<f64>>,
    pub flow: Vec<Vec<f64>>,
    pub avg_vol_pct: Vec<f64>,
    pub avg_flow: Vec<f64>,
    /// Percent-TLC volume converted back to absolute liters using `mean_tlc`.
    pub absolute_vol: Vec<Vec<f64>>,
    pub vol_stddev: Vec<f64>,
    pub flow_stddev: Vec<f64>,
}

pub fn build_table(columns: &[SubjectColumn]) -> CrossSubjectTable {
    let rows = columns.iter().map(|c| c.vol_pct.len()).max().unwrap_or(0);
    let mean_tlc = mean_skip_nan(&columns.iter().map(|c| c.tlc).collect::<Vec<_>>());

    let vol_pct: Vec<Vec<f64>> = columns.iter().map(|c| pad(&c.vol_pct, rows)).collect();
    let raw_vol: Vec<Vec<f64>> = columns.iter().map(|c| pad(&c.raw_vol, rows)).collect();
    let flow: Vec<Vec<f64>> = columns.iter().map(|c| pad(&c.flow, rows)).collect();

    let absolute_vol: Vec<Vec<f64>> = vol_pct
        .iter()
        .map(|col| col.iter().map(|&p| from_percent_tlc(p, mean_tlc)).collect())
        .collect();

    let avg_vol_pct = row_means(&vol_pct, rows);
    let avg_flow = row_means(&flow, rows);
    let vol_stddev = row_sample_sds(&absolute_vol, rows);
    let flow_stddev = row_sample_sds(&flow, rows);

    CrossSubjectTable {
        ids: columns.iter().map(|c| c.id.clone()).collect(),
        rows,
        mean_tlc,
        vol_pct,
        raw_vol,
        flow,
        avg_vol_pct,
        avg_flow,
        absolute_vol,
        vol_stddev,
        flow_stddev,
    }
}

fn pad(values: &[f64], rows: usize) -> Vec<f64> {
    let mut out = values.to_vec();
    out.resize(rows, f64::NAN);
    out
}

/// Mean across values, skipping `NaN`s. Empty/all-NaN input yields `NaN`.
pub fn mean_skip_nan(values: &[f64]) -> f64 {
    let present: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if present.is_empty() {
        return f64::NAN;
    }
    present.iter().sum::<f64>() / present.len() as f64
}

/// Sample standard deviation (denominator `B-1`) across values, skipping
/// `NaN`s; `NaN` if fewer than two present values remain.
pub fn sample_std_dev_skip_nan(values: &[f64]) -> f64 {
    let present: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    fvavg_core::sample_std_dev(&present)
}

fn row_means(columns: &[Vec<f64>], rows: usize) -> Vec<f64> {
    (0..rows)
        .map(|row| mean_skip_nan(&columns.iter().map(|col| col[row]).collect::<Vec<_>>()))
        .collect()
}

fn row_sample_sds(columns: &[Vec<f64>], rows: usize) -> Vec<f64> {
    (0..rows)
        .map(|row| sample_std_dev_skip_nan(&columns.iter().map(|col| col[row]).collect::<Vec<_>>()))
        .collect()
}
