//! Aggregated loops: cross-breath mean and sample standard deviation per
//! bin (§3, "Aggregated loop"; §4.6 Aggregator).

/// Mean and sample-SD of volume and flow across breaths, for one phase
/// under one resampling scheme. Each vector has length `K+1`.
#[derive(Debug, Clone, Default)]
pub struct PhaseStats {
    pub vol_mean: Vec<f64>,
    pub vol_sd: Vec<f64>,
    pub flow_mean: Vec<f64>,
    pub flow_sd: Vec<f64>,
}

/// The full averaged flow-volume loop for one resampling scheme.
#[derive(Debug, Clone, Default)]
pub struct AggregatedLoop {
    pub insp: PhaseStats,
    pub exp: PhaseStats,
}

impl AggregatedLoop {
    /// The concatenation `[Insp_mean(0..K), Exp_mean(0..K)]` used for
    /// plotting and comparison with a reference loop (§4.6).
    pub fn vol_loop(&self) -> Vec<f64> {
        self.insp
            .vol_mean
            .iter()
            .chain(self.exp.vol_mean.iter())
            .copied()
            .collect()
    }

    pub fn flow_loop(&self) -> Vec<f64> {
        self.insp
            .flow_mean
            .iter()
            .chain(self.exp.flow_mean.iter())
            .copied()
            .collect()
    }
}

/// Sample standard deviation with denominator `B-1`. `B<2` is undefined
/// and reported as `NaN` rather than 0, per §4.6.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    let b = values.len();
    if b < 2 {
        return f64::NAN;
    }
    let mean = values.iter().sum::<f64>() / b as f64;
    let var = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (b - 1) as f64;
    var.sqrt()
}

pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
