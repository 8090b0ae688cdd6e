//! Terminal report formatting.

use crate::app::pipeline::RunOutput;
use crate::domain::ForecastConfig;

/// Format the full run summary (series stats + hyperparameters + final losses).
pub fn format_run_summary(run: &RunOutput, config: &ForecastConfig) -> String {
    let mut out = String::new();

    out.push_str("=== fxf - FX Rate Forecast ===\n");
    out.push_str(&format!("Pair: {}\n", config.pair_label()));
    if config.offline {
        out.push_str("Source: offline synthetic series\n");
    }
    out.push_str(&format!(
        "History: n={} | {} -> {} | rate=[{:.4}, {:.4}]\n",
        run.stats.n_points,
        run.stats.first_date,
        run.stats.last_date,
        run.stats.rate_min,
        run.stats.rate_max,
    ));
    out.push_str(&format!(
        "Model: window={} | hidden={} | epochs={} | lr={:.4} | val split={:.2}\n",
        config.window, config.hidden, config.epochs, config.learning_rate, config.validation_split,
    ));

    if let Some(loss) = run.history.final_loss() {
        let val = match run.history.final_val_loss() {
            Some(v) => format!("{v:.6}"),
            None => "n/a".to_string(),
        };
        out.push_str(&format!("Final: loss={loss:.6} | val={val}\n"));
    }
    out.push('\n');

    out
}

/// Format the textual forecast list.
pub fn format_forecast(run: &RunOutput) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Forecast ({} days past {}):\n",
        run.forecast.len(),
        run.stats.last_date
    ));
    let last_observed = run.series.last().map(|p| p.rate);
    for point in &run.forecast {
        let delta = last_observed
            .map(|r| format!("{:+.4}", point.rate - r))
            .unwrap_or_default();
        out.push_str(&format!("  {}  {:.4}  ({delta})\n", point.date, point.rate));
    }

    out
}
