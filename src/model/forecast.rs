//! Iterative multi-step forecasting over a rolling window.

/// Extend a series `horizon` steps past its end by feeding each prediction
/// back in as input for the next step.
///
/// This is a strictly sequential accumulator loop: each step depends on
/// every previous prediction in the same run, and the window keeps its
/// length by dropping the oldest value as each prediction is appended.
/// Outputs are in the same (normalized) units as the inputs.
pub fn roll_forward(
    predict: impl Fn(&[f64]) -> f64,
    last_window: &[f64],
    horizon: usize,
) -> Vec<f64> {
    let mut window = last_window.to_vec();
    let mut out = Vec::with_capacity(horizon);

    for _ in 0..horizon {
        let next = predict(&window);
        window.remove(0);
        window.push(next);
        out.push(next);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_exactly_horizon_predictions() {
        let out = roll_forward(|w| w[w.len() - 1] + 1.0, &[0.0, 1.0, 2.0], 7);
        assert_eq!(out.len(), 7);
        // Each step feeds on the previous prediction.
        assert_eq!(out, vec![3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
    }

    #[test]
    fn window_rolls_with_constant_length() {
        // Predicting the oldest entry makes the roll order observable.
        let out = roll_forward(
            |w| {
                assert_eq!(w.len(), 3);
                w[0]
            },
            &[1.0, 2.0, 3.0],
            5,
        );
        assert_eq!(out, vec![1.0, 2.0, 3.0, 1.0, 2.0]);
    }

    #[test]
    fn zero_horizon_produces_nothing() {
        let out = roll_forward(|_| 0.0, &[1.0, 2.0], 0);
        assert!(out.is_empty());
    }
}
