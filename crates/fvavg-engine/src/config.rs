//! Engine runtime configuration (§6 "Parameters").

use fvavg_core::{FvavgError, FvavgResult};

/// `K`, the number of bin intervals each breath phase is resampled to
/// (`K+1` points per phase).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub intervals: usize,
}

impl EngineConfig {
    pub fn new(intervals: usize) -> FvavgResult<Self> {
        if intervals == 0 {
            return Err(FvavgError::Parameter(
                "intervals (K) must be a positive integer".to_string(),
            ));
        }
        Ok(Self { intervals })
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { intervals: 100 }
    }
}
