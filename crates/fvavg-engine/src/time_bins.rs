//! Time-bin resampler and volume normalizer (§4.4).

use fvavg_core::{BreathBins, PhaseBins};

use crate::peel::RawBreath;

/// A breath's time-bin bundle before and after volume normalization.
#[derive(Debug, Clone)]
pub struct TimeBinBreath {
    pub raw: BreathBins,
    pub normalized: BreathBins,
}

/// Normalization accumulators shared by every breath (§4.4 steps 2-3).
#[derive(Debug, Clone, Copy)]
pub struct NormalizationSummary {
    pub mean_shift: f64,
    pub avg_vt_insp: f64,
    pub avg_vt_exp: f64,
}

/// Resample every breath onto `K+1` time bins, then normalize volume across
/// breaths so they share a common tidal volume while preserving the mean
/// absolute level (the `Mean_shift` add-back happens later, in the
/// aggregator, only for the time scheme).
pub fn resample_and_normalize(breaths: &[RawBreath], k: usize) -> (Vec<TimeBinBreath>, NormalizationSummary) {
    let b = breaths.len();

    let raw: Vec<BreathBins> = breaths
        .iter()
        .map(|breath| BreathBins {
            insp: resample_phase(&breath.insp, breath.tt_insp, k),
            exp: resample_phase(&breath.exp, breath.tt_exp, k),
        })
        .collect();

    let mut normalized = raw.clone();
    let mut shift_sum = 0.0;
    for bins in &mut normalized {
        let insp_shift = *bins.insp.vol.last().unwrap();
        shift_sum += insp_shift;
        for v in &mut bins.insp.vol {
            *v -= insp_shift;
        }

        let exp_shift = bins.exp.vol[0];
        shift_sum += exp_shift;
        for v in &mut bins.exp.vol {
            *v -= exp_shift;
        }
    }
    let mean_shift = shift_sum / (2 * b) as f64;

    let avg_vt_insp = mean(&breaths.iter().map(|br| br.vt_insp).collect::<Vec<_>>());
    let avg_vt_exp = mean(&breaths.iter().map(|br| br.vt_exp).collect::<Vec<_>>());

    for (bins, breath) in normalized.iter_mut().zip(breaths) {
        for v in &mut bins.insp.vol {
            *v = *v / breath.vt_insp * avg_vt_insp;
        }
        for v in &mut bins.exp.vol {
            *v = *v / breath.vt_exp * avg_vt_exp;
        }
    }

    let bundles = raw
        .into_iter()
        .zip(normalized)
        .map(|(raw, normalized)| TimeBinBreath { raw, normalized })
        .collect();

    (
        bundles,
        NormalizationSummary {
            mean_shift,
            avg_vt_insp,
            avg_vt_exp,
        },
    )
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn resample_phase(phase: &fvavg_core::Recording, total_time: f64, k: usize) -> PhaseBins {
    let mut bins = PhaseBins::with_capacity(k + 1);
    for j in 0..=k {
        let target = total_time * j as f64 / k as f64;
        let (v, f) = interpolate_by_time(&phase.t, &phase.v, &phase.f, target);
        bins.time.push(target);
        bins.vol.push(v);
        bins.flow.push(f);
    }
    bins
}

/// Bracket `target` in `time` and linearly interpolate `vol`/`flow` (§4.4).
/// Exact endpoints are returned verbatim; an overrun (no bracketing segment
/// found, which happens whenever the last bin's target misses `time[n-1]`
/// by less than floating-point equality) falls back to the true last
/// sample.
fn interpolate_by_time(time: &[f64], vol: &[f64], flow: &[f64], target: f64) -> (f64, f64) {
    let n = time.len();
    if target == 0.0 {
        return (vol[0], flow[0]);
    }
    if target == time[n - 1] {
        return (vol[n - 1], flow[n - 1]);
    }
    for l in 0..n - 1 {
        if time[l] < target && target < time[l + 1] {
            let (t1, t2) = (time[l], time[l + 1]);
            let frac = (target - t1) / (t2 - t1);
            let v = vol[l] + (vol[l + 1] - vol[l]) * frac;
            let f = flow[l] + (flow[l + 1] - flow[l]) * frac;
            return (v, f);
        }
    }
    (vol[n - 1], flow[n - 1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use fvavg_core::Recording;

    fn breath(vt_insp: f64, vt_exp: f64) -> RawBreath {
        // Insp: volume falls from 0 to -vt_insp over 1s; Exp mirrors it back up.
        let insp = Recording::new(vec![0.0, 0.5, 1.0], vec![0.0, -vt_insp / 2.0, -vt_insp], vec![-1.0, -1.0, -1.0], 0.5);
        let exp = Recording::new(vec![0.0, 0.5, 1.0], vec![0.0, vt_exp / 2.0, vt_exp], vec![1.0, 1.0, 1.0], 0.5);
        RawBreath {
            insp,
            exp,
            tt_insp: 1.0,
            tt_exp: 1.0,
            vt_insp,
            vt_exp,
        }
    }

    #[test]
    fn normalization_rescales_to_the_mean_tidal_volume() {
        let breaths = vec![breath(1.0, 1.0), breath(2.0, 2.0)];
        let (bundles, summary) = resample_and_normalize(&breaths, 4);

        assert_relative_eq!(summary.avg_vt_insp, 1.5, epsilon = 1e-12);
        assert_relative_eq!(summary.avg_vt_exp, 1.5, epsilon = 1e-12);

        for bundle in &bundles {
            let excursion = (bundle.normalized.insp.vol[4] - bundle.normalized.insp.vol[0]).abs();
            assert_relative_eq!(excursion, 1.5, epsilon = 1e-9);
            let excursion_exp = (bundle.normalized.exp.vol[4] - bundle.normalized.exp.vol[0]).abs();
            assert_relative_eq!(excursion_exp, 1.5, epsilon = 1e-9);
        }
    }

    #[test]
    fn endpoints_match_the_original_phase_exactly() {
        let breaths = vec![breath(1.0, 1.0)];
        let (bundles, _) = resample_and_normalize(&breaths, 4);
        let raw = &bundles[0].raw;
        assert_eq!(raw.insp.time[0], 0.0);
        assert_relative_eq!(raw.insp.time[4], 1.0, epsilon = 1e-12);
        assert_relative_eq!(raw.insp.vol[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(raw.insp.vol[4], -1.0, epsilon = 1e-12);
    }

    #[test]
    fn last_bin_matches_the_last_sample_when_total_time_divides_unevenly() {
        // total_time=0.7, k=3: total_time*k/k doesn't bit-exactly equal
        // total_time, so the last bin's target misses the `target ==
        // time[n-1]` short-circuit and must fall back to the true last
        // sample rather than the second-to-last one.
        let phase = Recording::new(vec![0.0, 0.35, 0.7], vec![0.0, -0.5, -1.0], vec![-1.0, -1.0, -1.0], 0.35);
        let bins = resample_phase(&phase, 0.7, 3);
        assert_eq!(bins.vol[3], *phase.v.last().unwrap());
        assert_eq!(bins.flow[3], *phase.f.last().unwrap());
    }
}
