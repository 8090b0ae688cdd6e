//! Small numeric helpers shared by training and reporting.

/// Mean squared error between predictions and targets.
///
/// Returns `None` for empty or mismatched slices so callers can decide how
/// to report the absence of a metric (e.g. an empty validation split).
pub fn mse(predictions: &[f64], targets: &[f64]) -> Option<f64> {
    if predictions.is_empty() || predictions.len() != targets.len() {
        return None;
    }
    let sum: f64 = predictions
        .iter()
        .zip(targets)
        .map(|(p, t)| (p - t) * (p - t))
        .sum();
    Some(sum / predictions.len() as f64)
}

/// Root mean squared error.
pub fn rmse(predictions: &[f64], targets: &[f64]) -> Option<f64> {
    mse(predictions, targets).map(f64::sqrt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mse_of_known_values() {
        let mse = mse(&[1.0, 2.0, 3.0], &[1.0, 2.0, 5.0]).unwrap();
        assert!((mse - 4.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn rmse_is_sqrt_of_mse() {
        let rmse = rmse(&[0.0, 0.0], &[3.0, 4.0]).unwrap();
        assert!((rmse - (12.5_f64).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn empty_or_mismatched_inputs_yield_none() {
        assert!(mse(&[], &[]).is_none());
        assert!(mse(&[1.0], &[1.0, 2.0]).is_none());
    }
}
