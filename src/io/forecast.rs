//! Read/write forecast JSON files.
//!
//! Forecast JSON is the "portable" representation of a completed run:
//! - the pair and hyperparameters that produced it
//! - final training diagnostics
//! - the historical series and the forecast itself
//!
//! The schema is defined by `domain::ForecastFile`; `fxf plot` re-renders
//! a saved file without refetching or retraining.

use std::fs::File;
use std::path::Path;

use crate::app::pipeline::RunOutput;
use crate::domain::{ForecastConfig, ForecastFile};
use crate::error::AppError;

/// Write a forecast JSON file.
pub fn write_forecast_json(
    path: &Path,
    run: &RunOutput,
    config: &ForecastConfig,
) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::io(format!(
            "Failed to create forecast JSON '{}': {e}",
            path.display()
        ))
    })?;

    let out = ForecastFile {
        tool: "fxf".to_string(),
        base: config.base.clone(),
        quote: config.quote.clone(),
        window: config.window,
        horizon: config.horizon,
        last_observed: run.stats.last_date,
        final_loss: run.history.final_loss(),
        final_val_loss: run.history.final_val_loss(),
        history: run.series.clone(),
        forecast: run.forecast.clone(),
    };

    serde_json::to_writer_pretty(file, &out)
        .map_err(|e| AppError::io(format!("Failed to write forecast JSON: {e}")))?;

    Ok(())
}

/// Read a forecast JSON file.
pub fn read_forecast_json(path: &Path) -> Result<ForecastFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::io(format!(
            "Failed to open forecast JSON '{}': {e}",
            path.display()
        ))
    })?;
    let forecast: ForecastFile = serde_json::from_reader(file)
        .map_err(|e| AppError::io(format!("Invalid forecast JSON: {e}")))?;
    Ok(forecast)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ForecastPoint, RatePoint};
    use chrono::NaiveDate;

    #[test]
    fn forecast_file_round_trips_through_json() {
        let d = |day: u32| NaiveDate::from_ymd_opt(2026, 8, day).unwrap();
        let original = ForecastFile {
            tool: "fxf".to_string(),
            base: "EUR".to_string(),
            quote: "USD".to_string(),
            window: 14,
            horizon: 7,
            last_observed: d(24),
            final_loss: Some(0.0021),
            final_val_loss: None,
            history: vec![RatePoint { date: d(23), rate: 1.09 }],
            forecast: vec![ForecastPoint { date: d(25), rate: 1.091 }],
        };

        let json = serde_json::to_string(&original).unwrap();
        let parsed: ForecastFile = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.quote, "USD");
        assert_eq!(parsed.last_observed, d(24));
        assert_eq!(parsed.history, original.history);
        assert_eq!(parsed.forecast, original.forecast);
        assert_eq!(parsed.final_val_loss, None);
    }
}
