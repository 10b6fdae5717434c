//! Per-breath resampled bundles (§3, "Per-breath resampled bundle").

use serde::Serialize;

/// One phase's resampled (time, volume, flow) triples, length `K+1`.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct PhaseBins {
    pub time: Vec<f64>,
    pub vol: Vec<f64>,
    pub flow: Vec<f64>,
}

impl PhaseBins {
    pub fn with_capacity(k_plus_one: usize) -> Self {
        Self {
            time: Vec::with_capacity(k_plus_one),
            vol: Vec::with_capacity(k_plus_one),
            flow: Vec::with_capacity(k_plus_one),
        }
    }
}

/// A single breath's bins under one resampling scheme (time or volume).
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct BreathBins {
    pub insp: PhaseBins,
    pub exp: PhaseBins,
}

/// Per-breath scalars: phase durations and tidal volumes (§3).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BreathScalars {
    pub tt_insp: f64,
    pub tt_exp: f64,
    pub vt_insp: f64,
    pub vt_exp: f64,
}

/// Everything computed for one breath: both resampling schemes, both
/// normalized and unnormalized time-bin volume, and the scalar durations
/// used to drive normalization.
#[derive(Debug, Clone, Default)]
pub struct Breath {
    /// Time-bin bundle before volume normalization (§4.4).
    pub time_bins_raw: BreathBins,
    /// Time-bin bundle after volume normalization (§4.4).
    pub time_bins_normalized: BreathBins,
    /// Volume-bin bundle, computed from the unnormalized phases (§4.5).
    pub volume_bins: BreathBins,
    /// The original (unnormalized, un-resampled) per-phase samples, kept
    /// for the `Original Breath i` output sheet.
    pub original_insp: crate::Recording,
    pub original_exp: crate::Recording,
    pub scalars: BreathScalars,
}
