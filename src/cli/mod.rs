//! Command-line parsing for the FX forecast tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the pipeline/model code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "fxf", version, about = "FX rate forecaster (client-side RNN)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch rates, train, forecast, and print the report/plot.
    Forecast(ForecastArgs),
    /// Plot a previously exported forecast JSON.
    Plot(PlotArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same underlying pipeline as `fxf forecast`, but renders
    /// results in a terminal UI using Ratatui.
    Tui(ForecastArgs),
}

/// Common options for forecasting.
#[derive(Debug, Parser, Clone)]
pub struct ForecastArgs {
    /// Base currency code.
    #[arg(short = 'b', long, default_value = "EUR")]
    pub base: String,

    /// Quote currency code.
    #[arg(short = 'q', long, default_value = "USD")]
    pub quote: String,

    /// Days of history to fetch (ending today).
    #[arg(short = 'd', long, default_value_t = 180)]
    pub days: u32,

    /// Window width: how many past rates feed one prediction.
    #[arg(short = 'w', long, default_value_t = 14)]
    pub window: usize,

    /// Days to forecast past the last observation.
    #[arg(long, default_value_t = 7)]
    pub horizon: usize,

    /// Recurrent/dense hidden layer size.
    #[arg(long, default_value_t = 16)]
    pub hidden: usize,

    /// Passes over the training set.
    #[arg(short = 'e', long, default_value_t = 60)]
    pub epochs: usize,

    /// SGD learning rate.
    #[arg(long, default_value_t = 0.05)]
    pub learning_rate: f64,

    /// Fraction of samples held out for validation.
    #[arg(long, default_value_t = 0.1)]
    pub validation_split: f64,

    /// Seed for weight init, shuffling, and the offline generator.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Use a seeded synthetic series instead of the rate provider.
    #[arg(long)]
    pub offline: bool,

    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export observed + forecast points to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the forecast (pair + diagnostics + series) to JSON.
    #[arg(long = "export-forecast")]
    pub export_forecast: Option<PathBuf>,
}

/// Options for plotting a saved forecast.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Forecast JSON file produced by `fxf forecast --export-forecast`.
    #[arg(long, value_name = "JSON")]
    pub forecast: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}
