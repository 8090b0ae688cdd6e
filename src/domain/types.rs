//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during a pipeline run
//! - exported to JSON/CSV
//! - reloaded later for plotting

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One observed exchange rate: the quote-currency price of one unit of the
/// base currency on a given calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatePoint {
    pub date: NaiveDate,
    pub rate: f64,
}

/// One predicted exchange rate for a future calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub rate: f64,
}

/// Summary stats about the historical series actually used for training.
#[derive(Debug, Clone, Copy)]
pub struct SeriesStats {
    pub n_points: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub rate_min: f64,
    pub rate_max: f64,
}

impl SeriesStats {
    /// Compute stats for a non-empty, ascending series.
    pub fn from_series(series: &[RatePoint]) -> Option<Self> {
        let first = series.first()?;
        let last = series.last()?;
        let mut rate_min = f64::INFINITY;
        let mut rate_max = f64::NEG_INFINITY;
        for p in series {
            rate_min = rate_min.min(p.rate);
            rate_max = rate_max.max(p.rate);
        }
        if !(rate_min.is_finite() && rate_max.is_finite()) {
            return None;
        }
        Some(Self {
            n_points: series.len(),
            first_date: first.date,
            last_date: last.date,
            rate_min,
            rate_max,
        })
    }
}

/// Per-epoch training diagnostics.
///
/// `val_loss` is `None` when the held-out split is empty (too few samples);
/// that is reported, not treated as an error.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EpochReport {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Mean squared error over the training split (normalized units).
    pub loss: f64,
    /// Mean squared error over the validation split, if any.
    pub val_loss: Option<f64>,
}

/// Collected per-epoch reports for a completed training run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainHistory {
    pub epochs: Vec<EpochReport>,
}

impl TrainHistory {
    pub fn final_loss(&self) -> Option<f64> {
        self.epochs.last().map(|e| e.loss)
    }

    pub fn final_val_loss(&self) -> Option<f64> {
        self.epochs.last().and_then(|e| e.val_loss)
    }
}

/// Pipeline stages, in execution order.
///
/// A run walks these strictly forward; any error is terminal and no stage
/// is re-entered. Stage entry is surfaced through the progress callback so
/// front-ends can show what the pipeline is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    Preparing,
    Training,
    Forecasting,
}

impl Stage {
    pub fn display_name(self) -> &'static str {
        match self {
            Stage::Fetching => "fetching rates",
            Stage::Preparing => "preparing windows",
            Stage::Training => "training model",
            Stage::Forecasting => "forecasting",
        }
    }
}

/// Progress events emitted by the pipeline.
#[derive(Debug, Clone, Copy)]
pub enum Progress {
    Stage(Stage),
    Epoch(EpochReport),
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults); hyperparameters are
/// fixed configuration, not tuned.
#[derive(Debug, Clone)]
pub struct ForecastConfig {
    /// Base currency code (e.g. "EUR").
    pub base: String,
    /// Quote currency code (e.g. "USD").
    pub quote: String,
    /// Days of history to fetch, ending today.
    pub days: u32,
    /// Window width W: how many past rates feed one prediction.
    pub window: usize,
    /// Number of future days to forecast.
    pub horizon: usize,
    /// Recurrent/dense hidden layer size.
    pub hidden: usize,
    /// Passes over the training set.
    pub epochs: usize,
    /// SGD learning rate.
    pub learning_rate: f64,
    /// Fraction of samples held out for validation (most recent first).
    pub validation_split: f64,
    /// Seed for weight init, shuffling, and the offline sample generator.
    pub seed: u64,
    /// Use the synthetic offline series instead of the rate provider.
    pub offline: bool,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_results: Option<std::path::PathBuf>,
    pub export_forecast: Option<std::path::PathBuf>,
}

impl ForecastConfig {
    pub fn pair_label(&self) -> String {
        format!("{}/{}", self.base, self.quote)
    }
}

/// A saved forecast file (JSON).
///
/// This is the "portable" representation of a completed run: enough to
/// re-render the chart and forecast list without refetching or retraining.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastFile {
    pub tool: String,
    pub base: String,
    pub quote: String,
    pub window: usize,
    pub horizon: usize,
    pub last_observed: NaiveDate,
    pub final_loss: Option<f64>,
    pub final_val_loss: Option<f64>,
    pub history: Vec<RatePoint>,
    pub forecast: Vec<ForecastPoint>,
}
