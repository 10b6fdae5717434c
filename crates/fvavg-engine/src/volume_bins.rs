//! Volume-bin resampler (§4.5). Operates on the original, unnormalized
//! per-breath phases — never on the time-bin scheme's normalized volumes.

use fvavg_core::{BreathBins, PhaseBins};

use crate::peel::RawBreath;

pub fn resample_breaths(breaths: &[RawBreath], k: usize) -> Vec<BreathBins> {
    breaths
        .iter()
        .map(|breath| BreathBins {
            insp: resample_insp(&breath.insp, breath.vt_insp, k),
            exp: resample_exp(&breath.exp, breath.vt_exp, k),
        })
        .collect()
}

fn resample_insp(phase: &fvavg_core::Recording, vt: f64, k: usize) -> PhaseBins {
    let start = phase.v[0];
    let mut bins = PhaseBins::with_capacity(k + 1);
    for j in 0..=k {
        let target = start - vt * j as f64 / k as f64;
        let (t, f) = locate_insp(&phase.t, &phase.v, &phase.f, target);
        bins.time.push(t);
        bins.vol.push(target);
        bins.flow.push(f);
    }
    bins
}

fn resample_exp(phase: &fvavg_core::Recording, vt: f64, k: usize) -> PhaseBins {
    let start = phase.v[0];
    let mut bins = PhaseBins::with_capacity(k + 1);
    for j in 0..=k {
        let target = start + vt * j as f64 / k as f64;
        let (t, f) = locate_exp(&phase.t, &phase.v, &phase.f, target);
        bins.time.push(t);
        bins.vol.push(target);
        bins.flow.push(f);
    }
    bins
}

/// Inspiration volume is strictly decreasing: bracket by `v_l > target > v_{l+1}`.
fn locate_insp(time: &[f64], vol: &[f64], flow: &[f64], target: f64) -> (f64, f64) {
    let n = vol.len();
    if target == vol[0] {
        return (time[0], flow[0]);
    }
    if target == vol[n - 1] {
        return (time[n - 1], flow[n - 1]);
    }
    for l in 0..n - 1 {
        if vol[l] == target {
            return (time[l], flow[l]);
        }
        if vol[l] > target && target > vol[l + 1] {
            return interpolate(time, vol, flow, l, target);
        }
    }
    (time[n - 1], flow[n - 1])
}

/// Expiration volume is strictly increasing: bracket by `v_l < target < v_{l+1}`.
fn locate_exp(time: &[f64], vol: &[f64], flow: &[f64], target: f64) -> (f64, f64) {
    let n = vol.len();
    if target == vol[0] {
        return (time[0], flow[0]);
    }
    if target == vol[n - 1] {
        return (time[n - 1], flow[n - 1]);
    }
    for l in 0..n - 1 {
        if vol[l] == target {
            return (time[l], flow[l]);
        }
        if vol[l] < target && target < vol[l + 1] {
            return interpolate(time, vol, flow, l, target);
        }
    }
    (time[n - 1], flow[n - 1])
}

fn interpolate(time: &[f64], vol: &[f64], flow: &[f64], l: usize, target: f64) -> (f64, f64) {
    let (t1, t2) = (time[l], time[l + 1]);
    let (v1, v2) = (vol[l], vol[l + 1]);
    let (f1, f2) = (flow[l], flow[l + 1]);
    let t_star = t1 + (target - v1) / ((v2 - v1) / (t2 - t1));
    let f_star = f1 + (f2 - f1) / (t2 - t1) * (t_star - t1);
    (t_star, f_star)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use fvavg_core::Recording;

    #[test]
    fn insp_volume_bins_are_strictly_decreasing() {
        let insp = Recording::new(vec![0.0, 0.25, 0.5, 0.75, 1.0], vec![0.0, -0.3, -0.6, -0.8, -1.0], vec![-1.0, -1.2, -1.6, -0.8, -1.0], 0.25);
        let breath = RawBreath {
            insp: insp.clone(),
            exp: insp,
            tt_insp: 1.0,
            tt_exp: 1.0,
            vt_insp: 1.0,
            vt_exp: 1.0,
        };
        let bins = resample_breaths(&[breath], 4);
        let vol = &bins[0].insp.vol;
        for w in vol.windows(2) {
            assert!(w[0] > w[1], "insp volume bins must strictly decrease");
        }
        assert_relative_eq!(vol[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(vol[4], -1.0, epsilon = 1e-12);
    }

    #[test]
    fn last_bin_locates_the_true_last_sample_on_overrun() {
        // vt=0.1, k=3: (vt*k)/k overshoots vt by about 1.4e-17, so the last
        // bin's target lands just past the phase's true minimum volume.
        // No interval brackets it, so the search must fall back to the
        // true last sample, not the second-to-last one.
        let phase = Recording::new(vec![0.0, 0.5, 1.0], vec![0.0, -0.05, -0.1], vec![-1.0, -1.5, -2.0], 0.5);
        let (t, f) = locate_insp(&phase.t, &phase.v, &phase.f, 0.0 - 0.1_f64 * 3.0 / 3.0);
        assert_eq!(t, *phase.t.last().unwrap());
        assert_eq!(f, *phase.f.last().unwrap());
    }
}
