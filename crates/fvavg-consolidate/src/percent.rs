//! Percent-TLC rescaling (§4.7).

use crate::error::{ConsolidateError, ConsolidateResult};

pub fn validate_tlc(tlc: f64) -> ConsolidateResult<()> {
    if tlc <= 0.0 {
        return Err(ConsolidateError::InvalidTlc(tlc));
    }
    Ok(())
}

/// `Vol%TLC = Vol / TLC * 100`.
pub fn to_percent_tlc(vol: &[f64], tlc: f64) -> Vec<f64> {
    vol.iter().map(|v| v / tlc * 100.0).collect()
}

/// Recover an absolute volume from a percent-TLC value using a (possibly
/// averaged) TLC, the inverse of [`to_percent_tlc`].
pub fn from_percent_tlc(pct: f64, tlc: f64) -> f64 {
    pct * tlc / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn round_trip_within_tolerance() {
        let tlc = 6.0;
        let vol = vec![3.0];
        let pct = to_percent_tlc(&vol, tlc);
        let back = from_percent_tlc(pct[0], tlc);
        assert_relative_eq!(back, vol[0], epsilon = 1e-9);
    }

    #[test]
    fn negative_tlc_is_rejected() {
        assert!(validate_tlc(-1.0).is_err());
    }

    #[test]
    fn zero_tlc_is_rejected() {
        assert!(validate_tlc(0.0).is_err());
    }
}
