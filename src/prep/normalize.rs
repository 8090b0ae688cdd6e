//! Linear rescaling of rates into [0, 1] using the observed min/max.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Min/max parameters derived once from a series.
///
/// A constant series (max == min) would make the normalization denominator
/// zero and poison every downstream value with NaN, so construction rejects
/// it with an explicit numeric-degeneracy error instead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormParams {
    pub min: f64,
    pub max: f64,
}

impl NormParams {
    /// Derive parameters from raw rate values.
    pub fn fit(values: &[f64]) -> Result<Self, AppError> {
        if values.is_empty() {
            return Err(AppError::data("Cannot normalize an empty series."));
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in values {
            if !v.is_finite() {
                return Err(AppError::data("Non-finite rate value in series."));
            }
            min = min.min(v);
            max = max.max(v);
        }

        if max == min {
            return Err(AppError::numeric_degeneracy(format!(
                "Historical series is constant ({min}); min/max normalization is undefined."
            )));
        }

        Ok(Self { min, max })
    }

    /// Map a raw value into [0, 1].
    pub fn normalize(&self, v: f64) -> f64 {
        (v - self.min) / (self.max - self.min)
    }

    /// Exact inverse of [`Self::normalize`].
    pub fn denormalize(&self, v: f64) -> f64 {
        v * (self.max - self.min) + self.min
    }

    pub fn normalize_all(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&v| self.normalize(v)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn normalize_then_denormalize_is_identity() {
        let values = [1.00, 1.01, 1.02, 1.03, 0.97];
        let norm = NormParams::fit(&values).unwrap();
        for &v in &values {
            let round_trip = norm.denormalize(norm.normalize(v));
            assert!((round_trip - v).abs() < 1e-12, "{round_trip} != {v}");
        }
    }

    #[test]
    fn normalized_values_lie_in_unit_interval() {
        let values = [2.0, 5.0, 3.0, 4.0];
        let norm = NormParams::fit(&values).unwrap();
        for &v in &values {
            let u = norm.normalize(v);
            assert!((0.0..=1.0).contains(&u), "{u} out of range");
        }
        assert_eq!(norm.normalize(2.0), 0.0);
        assert_eq!(norm.normalize(5.0), 1.0);
    }

    #[test]
    fn constant_series_is_rejected() {
        let err = NormParams::fit(&[1.1, 1.1, 1.1]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NumericDegeneracy);
    }

    #[test]
    fn empty_series_is_rejected() {
        let err = NormParams::fit(&[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Data);
    }
}
