//! Peels the trimmed, augmented sequence into per-breath inspiration and
//! expiration phases (§4.4, first paragraph), each with its own zeroed time
//! axis and the scalar duration/tidal-volume pair derived from it.

use fvavg_core::Recording;

use crate::trim::TrimmedRecording;

/// One breath's original (unnormalized, un-resampled) phase data, the
/// common input to both the time-bin and volume-bin resamplers.
#[derive(Debug, Clone)]
pub struct RawBreath {
    pub insp: Recording,
    pub exp: Recording,
    pub tt_insp: f64,
    pub tt_exp: f64,
    pub vt_insp: f64,
    pub vt_exp: f64,
}

pub fn peel_breaths(trimmed: &TrimmedRecording) -> Vec<RawBreath> {
    let boundaries = phase_boundaries(&trimmed.phase_lengths);
    let samples = &trimmed.samples;
    let breaths = trimmed.breath_count();

    (0..breaths)
        .map(|i| {
            let insp = zeroed_phase(samples, boundaries[2 * i], boundaries[2 * i + 1]);
            let exp = zeroed_phase(samples, boundaries[2 * i + 1], boundaries[2 * i + 2]);

            let tt_insp = *insp.t.last().unwrap();
            let tt_exp = *exp.t.last().unwrap();
            let vt_insp = (insp.v.last().unwrap() - insp.v[0]).abs();
            let vt_exp = (exp.v.last().unwrap() - exp.v[0]).abs();

            RawBreath {
                insp,
                exp,
                tt_insp,
                tt_exp,
                vt_insp,
                vt_exp,
            }
        })
        .collect()
}

fn phase_boundaries(phase_lengths: &[usize]) -> Vec<usize> {
    let mut bounds = Vec::with_capacity(phase_lengths.len() + 1);
    bounds.push(0);
    let mut acc = 0;
    for &len in phase_lengths {
        acc += len;
        bounds.push(acc);
    }
    bounds
}

/// Slice `[start, end)` out of `samples`, zeroing time so the phase starts
/// at `t = 0` (§4.4).
fn zeroed_phase(samples: &Recording, start: usize, end: usize) -> Recording {
    let t0 = samples.t[start];
    let t: Vec<f64> = samples.t[start..end].iter().map(|t| t - t0).collect();
    let v = samples.v[start..end].to_vec();
    let f = samples.f[start..end].to_vec();
    Recording::new(t, v, f, samples.dt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peels_two_breaths_with_zeroed_time() {
        let t: Vec<f64> = (0..8).map(|k| 10.0 + k as f64).collect();
        let v = vec![0.0, -2.0, -2.0, 0.0, 0.0, -2.0, -2.0, 0.0];
        let f = vec![-1.0, -1.0, 0.0, 1.0, -1.0, -1.0, 0.0, 1.0];
        let samples = Recording::new(t, v, f, 1.0);
        let trimmed = TrimmedRecording {
            samples,
            phase_lengths: vec![2, 2, 2, 2],
        };

        let breaths = peel_breaths(&trimmed);
        assert_eq!(breaths.len(), 2);
        assert_eq!(breaths[0].insp.t, vec![0.0, 1.0]);
        assert_eq!(breaths[0].exp.t, vec![0.0, 1.0]);
        assert_eq!(breaths[0].vt_insp, 2.0);
    }
}
