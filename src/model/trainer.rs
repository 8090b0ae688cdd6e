//! Training loop: SGD over windowed samples with a time-ordered holdout.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::domain::{EpochReport, TrainHistory};
use crate::error::AppError;
use crate::math;
use crate::prep::WindowSet;

use super::rnn::RateRnn;

/// Global gradient-norm clip for SGD stability.
const CLIP_NORM: f64 = 5.0;

/// Fixed training hyperparameters (taken from the CLI, not tuned).
#[derive(Debug, Clone, Copy)]
pub struct TrainSettings {
    pub epochs: usize,
    pub learning_rate: f64,
    /// Fraction of samples held out for validation.
    pub validation_split: f64,
    /// Seed for the per-epoch sample shuffle.
    pub seed: u64,
}

/// Mean squared error of the model over a set of pairs.
///
/// `None` when the set is empty.
pub fn evaluate(model: &RateRnn, inputs: &[Vec<f64>], targets: &[f64]) -> Option<f64> {
    let predictions: Vec<f64> = inputs.iter().map(|w| model.predict(w)).collect();
    math::mse(&predictions, targets)
}

/// Fit the model in place, reporting per-epoch diagnostics as they happen.
///
/// The holdout is the *most recent* fraction of samples so validation is
/// always on data the model has not seen and that is closest in time to
/// the forecast horizon. An empty holdout reports `val_loss = None` and
/// never blocks completion.
pub fn fit(
    model: &mut RateRnn,
    windows: &WindowSet,
    settings: &TrainSettings,
    progress: &mut dyn FnMut(EpochReport),
) -> Result<TrainHistory, AppError> {
    let n = windows.len();
    if n == 0 {
        return Err(AppError::training("No training pairs to fit."));
    }
    if !(0.0..1.0).contains(&settings.validation_split) {
        return Err(AppError::training(format!(
            "Validation split {} must be in [0, 1).",
            settings.validation_split
        )));
    }
    if !(settings.learning_rate.is_finite() && settings.learning_rate > 0.0) {
        return Err(AppError::training("Learning rate must be positive."));
    }

    let n_val = ((n as f64) * settings.validation_split).round() as usize;
    let n_val = n_val.min(n - 1);
    let n_train = n - n_val;

    let train_inputs = &windows.inputs[..n_train];
    let train_targets = &windows.targets[..n_train];
    let val_inputs = &windows.inputs[n_train..];
    let val_targets = &windows.targets[n_train..];

    let mut rng = StdRng::seed_from_u64(settings.seed);
    let mut order: Vec<usize> = (0..n_train).collect();
    let mut history = TrainHistory::default();

    for epoch in 1..=settings.epochs {
        order.shuffle(&mut rng);

        let mut loss_sum = 0.0;
        for &i in &order {
            let xs = &train_inputs[i];
            let target = train_targets[i];

            let cache = model.forward_cached(xs);
            let err = cache.prediction - target;
            loss_sum += err * err;

            let mut grads = model.backward(xs, &cache, 2.0 * err);
            grads.clip(CLIP_NORM);
            model.apply(&grads, settings.learning_rate);
        }

        let loss = loss_sum / n_train as f64;
        if !loss.is_finite() {
            return Err(AppError::training(format!(
                "Training diverged at epoch {epoch} (non-finite loss)."
            )));
        }

        let val_loss = evaluate(model, val_inputs, val_targets);
        let report = EpochReport {
            epoch,
            loss,
            val_loss,
        };
        progress(report);
        history.epochs.push(report);
    }

    Ok(history)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prep::make_windows;

    fn sine_windows(n: usize, window: usize) -> WindowSet {
        let series: Vec<f64> = (0..n).map(|i| 0.5 + 0.4 * (i as f64 * 0.3).sin()).collect();
        make_windows(&series, window)
    }

    #[test]
    fn history_has_one_report_per_epoch() {
        let windows = sine_windows(40, 6);
        let mut model = RateRnn::new(6, 4, 5);
        let settings = TrainSettings {
            epochs: 3,
            learning_rate: 0.01,
            validation_split: 0.2,
            seed: 5,
        };
        let mut seen = 0usize;
        let history = fit(&mut model, &windows, &settings, &mut |_| seen += 1).unwrap();
        assert_eq!(history.epochs.len(), 3);
        assert_eq!(seen, 3);
        assert!(history.epochs.iter().all(|e| e.val_loss.is_some()));
    }

    #[test]
    fn zero_split_reports_no_validation_loss() {
        let windows = sine_windows(30, 5);
        let mut model = RateRnn::new(5, 4, 5);
        let settings = TrainSettings {
            epochs: 2,
            learning_rate: 0.01,
            validation_split: 0.0,
            seed: 9,
        };
        let history = fit(&mut model, &windows, &settings, &mut |_| {}).unwrap();
        assert!(history.epochs.iter().all(|e| e.val_loss.is_none()));
    }

    #[test]
    fn loss_decreases_on_smooth_series() {
        let windows = sine_windows(100, 8);
        let mut model = RateRnn::new(8, 8, 1);
        let settings = TrainSettings {
            epochs: 60,
            learning_rate: 0.05,
            validation_split: 0.2,
            seed: 1,
        };
        let history = fit(&mut model, &windows, &settings, &mut |_| {}).unwrap();
        let first = history.epochs.first().unwrap().loss;
        let last = history.epochs.last().unwrap().loss;
        assert!(last < first, "loss did not decrease: {first} -> {last}");
        assert!(last.is_finite());
    }

    #[test]
    fn empty_window_set_is_a_training_error() {
        let windows = make_windows(&[0.1, 0.2], 4);
        let mut model = RateRnn::new(4, 4, 0);
        let settings = TrainSettings {
            epochs: 1,
            learning_rate: 0.01,
            validation_split: 0.1,
            seed: 0,
        };
        assert!(fit(&mut model, &windows, &settings, &mut |_| {}).is_err());
    }
}
