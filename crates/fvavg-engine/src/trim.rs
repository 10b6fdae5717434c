//! Trimmer (§4.3): discards the partial breath at each end of the augmented
//! recording so only whole inspiration/expiration pairs remain.

use fvavg_core::{AugmentedRecording, FvavgError, FvavgResult, Recording};
use log::debug;

/// The augmented recording after leading/trailing trim: starts at the first
/// true inspiration sample, ends just after the last expiration-ending
/// crossing, with an even-length phase-lengths list (`2B` entries).
#[derive(Debug, Clone)]
pub struct TrimmedRecording {
    pub samples: Recording,
    pub phase_lengths: Vec<usize>,
}

impl TrimmedRecording {
    pub fn breath_count(&self) -> usize {
        self.phase_lengths.len() / 2
    }
}

pub fn trim(aug: &AugmentedRecording) -> FvavgResult<TrimmedRecording> {
    let f = &aug.samples.f;
    let n = f.len();

    let mut head = 0usize;
    let mut counter_start = 1.0_f64;
    loop {
        if head + 2 >= n {
            return Err(FvavgError::NoFullBreath);
        }
        if f[head] == 0.0 && f[head + 2] < 0.0 {
            head += 1;
            break;
        }
        if f[head] == 0.0 && f[head + 2] > 0.0 {
            counter_start += 0.5;
        }
        head += 1;
    }

    let mut end = n;
    let mut counter_end = 0.0_f64;
    loop {
        if end < 3 || end <= head {
            return Err(FvavgError::NoFullBreath);
        }
        if f[end - 3] == 0.0 && f[end - 1] < 0.0 {
            end -= 3;
            break;
        }
        if f[end - 3] == 0.0 && f[end - 1] > 0.0 {
            counter_end += 0.5;
        }
        end -= 1;
    }

    if end <= head {
        return Err(FvavgError::NoFullBreath);
    }

    let mut phase_lengths = aug.phase_lengths.clone();
    // counter_start/counter_end above these thresholds were never observed
    // in the source data; kept conservative rather than guessed (§9).
    if counter_start >= 2.0 {
        if phase_lengths.len() < 2 {
            return Err(FvavgError::NoFullBreath);
        }
        phase_lengths.drain(0..2);
    } else {
        if phase_lengths.is_empty() {
            return Err(FvavgError::NoFullBreath);
        }
        phase_lengths.remove(0);
    }

    if (counter_end - 1.0).abs() < 1e-9 {
        if phase_lengths.is_empty() {
            return Err(FvavgError::NoFullBreath);
        }
        phase_lengths.pop();
    }

    if phase_lengths.is_empty() || phase_lengths.len() % 2 != 0 {
        return Err(FvavgError::NoFullBreath);
    }

    let t = aug.samples.t[head..end].to_vec();
    let v = aug.samples.v[head..end].to_vec();
    let fv = aug.samples.f[head..end].to_vec();
    let samples = Recording::new(t, v, fv, aug.samples.dt);

    let breaths = phase_lengths.len() / 2;
    debug!(
        "trim: head={} end={} counter_start={} counter_end={} B={}",
        head, end, counter_start, counter_end, breaths
    );

    Ok(TrimmedRecording {
        samples,
        phase_lengths,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zero_cross::detect_zero_crossings;

    /// Four long steady blocks (exp, insp, exp, insp) so every internal sign
    /// change validates cleanly: this brackets exactly one full insp+exp
    /// breath between two expiration/inspiration boundary crossings.
    fn four_block_recording() -> Recording {
        let block = 70usize;
        let signs = [1.0, -1.0, 1.0, -1.0];
        let mut f = Vec::with_capacity(block * signs.len());
        for s in signs {
            f.extend(std::iter::repeat(s).take(block));
        }
        let n = f.len();
        let mut v = Vec::with_capacity(n);
        let mut acc = 0.0;
        for &flow in &f {
            v.push(acc);
            acc += flow;
        }
        let t: Vec<f64> = (0..n).map(|k| k as f64).collect();
        Recording::new(t, v, f, 1.0)
    }

    #[test]
    fn trims_to_one_full_breath() {
        let rec = four_block_recording();
        let aug = detect_zero_crossings(&rec);
        assert_eq!(aug.phase_lengths.len(), 3, "three validated crossings close three phases");

        let trimmed = trim(&aug).expect("trim");
        assert_eq!(trimmed.breath_count(), 1);
        assert_eq!(trimmed.phase_lengths.len(), 2);
        // First surviving sample is the duplicate insp-start synthetic point.
        assert_eq!(trimmed.samples.f[0], 0.0);
        let (insp_len, exp_len) = (trimmed.phase_lengths[0], trimmed.phase_lengths[1]);
        assert_eq!(insp_len + exp_len, trimmed.samples.len());
    }

    #[test]
    fn reports_no_full_breath_when_no_crossings_exist() {
        let n = 20;
        let t: Vec<f64> = (0..n).map(|k| k as f64).collect();
        let v = vec![0.0; n];
        let f = vec![-1.0; n];
        let samples = Recording::new(t, v, f, 1.0);
        let aug = AugmentedRecording {
            samples,
            phase_lengths: vec![],
        };
        assert!(matches!(trim(&aug), Err(FvavgError::NoFullBreath)));
    }
}
