//! Zero-crossing detector (§4.2): walks the raw recording once, validates
//! every sign change of flow against a forward/backward window, and emits
//! the augmented sequence the trimmer consumes.

use fvavg_core::{AugmentedRecording, PhaseKind, Recording};
use log::trace;

/// Samples after a candidate crossing that must share the new sign.
pub const FORWARD_WINDOW: usize = 30;
/// Samples in the backward-check window.
pub const BACK_WINDOW: usize = 20;
/// Steps back to the *far* edge of the backward-check window (so the
/// window covers `i-60..i-41`).
pub const BACK_OFFSET: usize = 41;
/// Volume nudge (litres) applied to a synthetic zero-crossing point so the
/// phase it closes stays strictly monotone in volume (§4.2 rationale).
pub const VOLUME_NUDGE_L: f64 = 0.001;

pub fn detect_zero_crossings(rec: &Recording) -> AugmentedRecording {
    let n = rec.len();
    let mut t = Vec::with_capacity(n);
    let mut v = Vec::with_capacity(n);
    let mut f = Vec::with_capacity(n);
    let mut phase_lengths = Vec::new();

    if n == 0 {
        return AugmentedRecording {
            samples: Recording::new(t, v, f, rec.dt),
            phase_lengths,
        };
    }

    let mut phase_len: usize = 0;
    let mut i = 0;
    while i + 1 < n {
        let (ti, vi, fi) = (rec.t[i], rec.v[i], rec.f[i]);
        let fi1 = rec.f[i + 1];

        let new_phase = crossing_phase(fi, fi1);
        let validated = new_phase.is_some_and(|kind| validate_crossing(&rec.f, i, kind));

        if let (true, Some(kind)) = (validated, new_phase) {
            // The pre-crossing raw sample closes out the current phase.
            t.push(ti);
            v.push(vi);
            f.push(fi);
            phase_len += 1;

            let ti1 = rec.t[i + 1];
            let t_star = ti + (0.0 - fi) * (ti1 - ti) / (fi1 - fi);
            let v_star = match kind {
                PhaseKind::Exp => rec.v[i].min(rec.v[i + 1]) - VOLUME_NUDGE_L,
                PhaseKind::Insp => rec.v[i].max(rec.v[i + 1]) + VOLUME_NUDGE_L,
            };

            // First synthetic point also belongs to the closing phase.
            t.push(t_star);
            v.push(v_star);
            f.push(0.0);
            phase_len += 1;
            phase_lengths.push(phase_len);

            // Second (duplicate) synthetic point opens the new phase.
            t.push(t_star);
            v.push(v_star);
            f.push(0.0);
            phase_len = 1;
        } else {
            t.push(ti);
            v.push(vi);
            f.push(fi);
            phase_len += 1;
        }

        i += 1;
    }

    // i == n-1 here: the last sample is always appended verbatim.
    t.push(rec.t[n - 1]);
    v.push(rec.v[n - 1]);
    f.push(rec.f[n - 1]);

    trace!(
        "zero-crossing detection: {} validated crossings, {} samples in",
        phase_lengths.len(),
        n
    );

    AugmentedRecording {
        samples: Recording::new(t, v, f, rec.dt),
        phase_lengths,
    }
}

/// The phase a crossing between `fi` and `fi1` would open, if the sign
/// change is unambiguous.
fn crossing_phase(fi: f64, fi1: f64) -> Option<PhaseKind> {
    match (PhaseKind::from_flow(fi), PhaseKind::from_flow(fi1)) {
        (Some(PhaseKind::Insp), Some(PhaseKind::Exp)) => Some(PhaseKind::Exp),
        (Some(PhaseKind::Exp), Some(PhaseKind::Insp)) => Some(PhaseKind::Insp),
        _ => None,
    }
}

/// Does `f` carry the sign expected of `kind` (§4.2's flow-sign convention)?
fn phase_sign_ok(kind: PhaseKind, f: f64) -> bool {
    match kind {
        PhaseKind::Insp => f < 0.0,
        PhaseKind::Exp => f > 0.0,
    }
}

fn validate_crossing(flow: &[f64], i: usize, new_phase: PhaseKind) -> bool {
    let n = flow.len();
    if i + 1 + FORWARD_WINDOW >= n {
        // The forward window would run past the end of the recording; the
        // source treats this as an unvalidated candidate (§9 open question).
        return false;
    }

    let forward_ok = (0..FORWARD_WINDOW).all(|k| phase_sign_ok(new_phase, flow[i + 2 + k]));
    if !forward_ok {
        return false;
    }

    let back_mean = backward_mean(flow, i);
    phase_sign_ok(new_phase.other(), back_mean)
}

/// Mean of `flow[i-60..=i-41]`. Indices that underflow contribute 0 to the
/// sum; the divisor stays `BACK_WINDOW` regardless (§4.2).
fn backward_mean(flow: &[f64], i: usize) -> f64 {
    let mut sum = 0.0;
    for j in BACK_OFFSET..BACK_OFFSET + BACK_WINDOW {
        if i >= j {
            sum += flow[i - j];
        }
    }
    sum / BACK_WINDOW as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a recording with a clean negative-to-positive crossing at the
    /// midpoint: enough steady samples on each side to satisfy both the
    /// forward and backward windows.
    fn neg_to_pos_recording() -> Recording {
        let lead = 80;
        let tail = FORWARD_WINDOW + 5;
        let mut t = Vec::new();
        let mut v = Vec::new();
        let mut f = Vec::new();
        let mut vol = 1.0;
        for k in 0..lead {
            t.push(k as f64 * 0.01);
            f.push(-1.0);
            vol -= 0.01;
            v.push(vol);
        }
        for k in 0..tail {
            t.push((lead + k) as f64 * 0.01);
            f.push(1.0);
            vol += 0.01;
            v.push(vol);
        }
        Recording::new(t, v, f, 0.01)
    }

    #[test]
    fn validated_crossing_emits_three_points_and_closes_phase() {
        let rec = neg_to_pos_recording();
        let aug = detect_zero_crossings(&rec);
        assert_eq!(aug.phase_lengths.len(), 1);
        // Leading phase: 80 raw samples (0..=79, the last pushed by the
        // validated branch) plus the first synthetic point.
        assert_eq!(aug.phase_lengths[0], 80 + 1);

        let close = aug.phase_lengths[0];
        assert!((aug.samples.f[close - 1]).abs() < 1e-12);
        assert!((aug.samples.f[close]).abs() < 1e-12);
        assert_eq!(aug.samples.t[close - 1], aug.samples.t[close]);
        assert_eq!(aug.samples.v[close - 1], aug.samples.v[close]);
    }

    #[test]
    fn forward_window_overrun_is_unvalidated() {
        // A single sign flip near the very end of a short recording can never
        // satisfy the forward window and must not be treated as a crossing.
        let t: Vec<f64> = (0..10).map(|k| k as f64 * 0.01).collect();
        let f = vec![-1.0; 9]
            .into_iter()
            .chain(std::iter::once(1.0))
            .collect::<Vec<_>>();
        let v = vec![0.0; 10];
        let rec = Recording::new(t, v, f, 0.01);
        let aug = detect_zero_crossings(&rec);
        assert!(aug.phase_lengths.is_empty());
        assert_eq!(aug.samples.len(), 10);
    }

    #[test]
    fn backward_check_rejects_crossing_with_wrong_history() {
        // Steady positive flow for a long stretch, then a brief dip that
        // reverts: the backward mean at the dip-to-rise crossing is still
        // positive, so a neg->pos crossing there must fail validation.
        let mut f = vec![1.0; 100];
        f[100 - 1] = -1.0;
        f.extend(vec![1.0; FORWARD_WINDOW + 5]);
        let n = f.len();
        let t: Vec<f64> = (0..n).map(|k| k as f64 * 0.01).collect();
        let v = vec![0.0; n];
        let rec = Recording::new(t, v, f, 0.01);
        let aug = detect_zero_crossings(&rec);
        assert!(aug.phase_lengths.is_empty());
    }
}
