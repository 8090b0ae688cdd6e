//! The forecast pipeline shared by the CLI and TUI front-ends.
//!
//! One invocation walks strictly forward through
//! Fetch -> Prepare -> Train -> Forecast; any error aborts the remaining
//! stages. Front-ends observe stage entry and per-epoch losses through the
//! progress callback and focus on presentation (printing vs widgets).

use chrono::{Duration, Local};

use crate::data;
use crate::domain::{
    ForecastConfig, ForecastPoint, Progress, RatePoint, SeriesStats, Stage, TrainHistory,
};
use crate::error::AppError;
use crate::model::{self, RateRnn, TrainSettings};
use crate::prep::{self, NormParams};

/// All computed outputs of a single forecast run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub series: Vec<RatePoint>,
    pub stats: SeriesStats,
    pub norm: NormParams,
    pub history: TrainHistory,
    pub forecast: Vec<ForecastPoint>,
}

/// Execute the full pipeline: fetch (or generate) the series, then
/// prepare, train, and forecast.
pub fn run_forecast(
    config: &ForecastConfig,
    progress: &mut dyn FnMut(Progress),
) -> Result<RunOutput, AppError> {
    validate_config(config)?;

    let end = Local::now().date_naive();
    progress(Progress::Stage(Stage::Fetching));

    let series = if config.offline {
        data::generate_series(&config.base, &config.quote, end, config.days, config.seed)?
    } else {
        let start = end - Duration::days(i64::from(config.days) - 1);
        data::RateClient::new().fetch_series(&config.base, &config.quote, start, end)?
    };

    run_forecast_with_series(config, series, progress)
}

/// Execute the pipeline with a pre-fetched series.
///
/// This is what the TUI uses to retrain without refetching, and what tests
/// use to stay off the network.
pub fn run_forecast_with_series(
    config: &ForecastConfig,
    series: Vec<RatePoint>,
    progress: &mut dyn FnMut(Progress),
) -> Result<RunOutput, AppError> {
    validate_config(config)?;

    if series.len() <= config.window {
        return Err(AppError::insufficient_data(format!(
            "Series has {} points; training needs at least window + 1 = {}.",
            series.len(),
            config.window + 1
        )));
    }

    let stats = SeriesStats::from_series(&series)
        .ok_or_else(|| AppError::data("Series has no finite rates."))?;

    progress(Progress::Stage(Stage::Preparing));
    let rates: Vec<f64> = series.iter().map(|p| p.rate).collect();
    let norm = NormParams::fit(&rates)?;
    let normalized = norm.normalize_all(&rates);
    let windows = prep::make_windows(&normalized, config.window);

    progress(Progress::Stage(Stage::Training));
    let mut model = RateRnn::new(config.window, config.hidden, config.seed);
    let settings = TrainSettings {
        epochs: config.epochs,
        learning_rate: config.learning_rate,
        validation_split: config.validation_split,
        seed: config.seed,
    };
    let history = model::fit(&mut model, &windows, &settings, &mut |report| {
        progress(Progress::Epoch(report))
    })?;

    progress(Progress::Stage(Stage::Forecasting));
    let last_window = &normalized[normalized.len() - config.window..];
    let predictions = model::roll_forward(|w| model.predict(w), last_window, config.horizon);

    let forecast = predictions
        .iter()
        .enumerate()
        .map(|(k, &p)| ForecastPoint {
            date: stats.last_date + Duration::days(k as i64 + 1),
            rate: norm.denormalize(p),
        })
        .collect();

    Ok(RunOutput {
        series,
        stats,
        norm,
        history,
        forecast,
    })
}

fn validate_config(config: &ForecastConfig) -> Result<(), AppError> {
    if config.window == 0 {
        return Err(AppError::usage("Window width must be > 0."));
    }
    if config.horizon == 0 {
        return Err(AppError::usage("Forecast horizon must be > 0."));
    }
    if config.hidden == 0 {
        return Err(AppError::usage("Hidden size must be > 0."));
    }
    if config.epochs == 0 {
        return Err(AppError::usage("Epoch count must be > 0."));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use chrono::NaiveDate;

    fn test_config() -> ForecastConfig {
        ForecastConfig {
            base: "EUR".to_string(),
            quote: "USD".to_string(),
            days: 60,
            window: 8,
            horizon: 7,
            hidden: 8,
            epochs: 5,
            learning_rate: 0.03,
            validation_split: 0.1,
            seed: 42,
            offline: true,
            plot: false,
            plot_width: 80,
            plot_height: 20,
            export_results: None,
            export_forecast: None,
        }
    }

    fn offline_series(config: &ForecastConfig) -> Vec<RatePoint> {
        let end = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();
        data::generate_series(&config.base, &config.quote, end, config.days, config.seed).unwrap()
    }

    #[test]
    fn offline_run_forecasts_seven_consecutive_days() {
        let config = test_config();
        let series = offline_series(&config);
        let last = series.last().unwrap().date;

        let run = run_forecast_with_series(&config, series, &mut |_| {}).unwrap();

        assert_eq!(run.forecast.len(), 7);
        for (k, point) in run.forecast.iter().enumerate() {
            assert_eq!(point.date, last + Duration::days(k as i64 + 1));
            assert!(point.rate.is_finite());
        }
        assert_eq!(run.history.epochs.len(), config.epochs);
    }

    #[test]
    fn stages_are_visited_in_order() {
        let config = test_config();
        let series = offline_series(&config);

        let mut stages = Vec::new();
        let mut epochs = 0usize;
        run_forecast_with_series(&config, series, &mut |p| match p {
            Progress::Stage(s) => stages.push(s),
            Progress::Epoch(_) => epochs += 1,
        })
        .unwrap();

        assert_eq!(
            stages,
            vec![Stage::Preparing, Stage::Training, Stage::Forecasting]
        );
        assert_eq!(epochs, config.epochs);
    }

    #[test]
    fn short_series_reports_insufficient_data_before_training() {
        let mut config = test_config();
        config.days = 5;
        config.window = 10;
        let series = offline_series(&config);

        let mut trained = false;
        let err = run_forecast_with_series(&config, series, &mut |p| {
            if matches!(p, Progress::Stage(Stage::Training)) {
                trained = true;
            }
        })
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InsufficientData);
        assert!(!trained);
    }

    #[test]
    fn constant_series_reports_numeric_degeneracy() {
        let config = test_config();
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let series: Vec<RatePoint> = (0..20)
            .map(|k| RatePoint {
                date: start + Duration::days(k),
                rate: 1.1,
            })
            .collect();

        let err = run_forecast_with_series(&config, series, &mut |_| {}).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NumericDegeneracy);
    }
}
