//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - runs the forecast pipeline
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, ForecastArgs, PlotArgs};
use crate::domain::{ForecastConfig, Progress};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `fxf` binary.
pub fn run() -> Result<(), AppError> {
    // We want `fxf` and `fxf -q GBP` to behave like `fxf tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Forecast(args) => handle_forecast(args),
        Command::Plot(args) => handle_plot(args),
        Command::Tui(args) => handle_tui(args),
    }
}

fn handle_forecast(args: ForecastArgs) -> Result<(), AppError> {
    let config = forecast_config_from_args(&args);

    // Progress is the pipeline's one observable side effect: stage entry
    // lines plus one line per training pass.
    let run = pipeline::run_forecast(&config, &mut |progress| match progress {
        Progress::Stage(stage) => println!("[{}]", stage.display_name()),
        Progress::Epoch(report) => {
            let val = match report.val_loss {
                Some(v) => format!("{v:.6}"),
                None => "n/a".to_string(),
            };
            println!(
                "  epoch {:>3}/{} loss={:.6} val={val}",
                report.epoch, config.epochs, report.loss
            );
        }
    })?;

    println!();
    print!("{}", crate::report::format_run_summary(&run, &config));
    print!("{}", crate::report::format_forecast(&run));

    if config.plot {
        let plot = crate::plot::render_ascii_plot(
            &run.series,
            &run.forecast,
            config.plot_width,
            config.plot_height,
        );
        println!("\n{plot}");
    }

    // Optional exports.
    if let Some(path) = &config.export_results {
        crate::io::export::write_results_csv(path, &run)?;
    }
    if let Some(path) = &config.export_forecast {
        crate::io::forecast::write_forecast_json(path, &run, &config)?;
    }

    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let file = crate::io::forecast::read_forecast_json(&args.forecast)?;

    let plot = crate::plot::render_ascii_plot_from_forecast_file(&file, args.width, args.height);
    println!("{plot}");

    println!("Forecast ({}/{}):", file.base, file.quote);
    for point in &file.forecast {
        println!("  {}  {:.4}", point.date, point.rate);
    }
    Ok(())
}

fn handle_tui(args: ForecastArgs) -> Result<(), AppError> {
    crate::tui::run(forecast_config_from_args(&args))
}

pub fn forecast_config_from_args(args: &ForecastArgs) -> ForecastConfig {
    ForecastConfig {
        base: args.base.to_uppercase(),
        quote: args.quote.to_uppercase(),
        days: args.days,
        window: args.window,
        horizon: args.horizon,
        hidden: args.hidden,
        epochs: args.epochs,
        learning_rate: args.learning_rate,
        validation_split: args.validation_split,
        seed: args.seed,
        offline: args.offline,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_results: args.export.clone(),
        export_forecast: args.export_forecast.clone(),
    }
}

/// Rewrite argv so `fxf` defaults to `fxf tui`.
///
/// Rules:
/// - `fxf`                     -> `fxf tui`
/// - `fxf -q GBP ...`          -> `fxf tui -q GBP ...`
/// - `fxf --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "forecast" | "plot" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(strings(&["fxf"])), strings(&["fxf", "tui"]));
        assert_eq!(
            rewrite_args(strings(&["fxf", "-q", "GBP"])),
            strings(&["fxf", "tui", "-q", "GBP"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        assert_eq!(
            rewrite_args(strings(&["fxf", "forecast", "--offline"])),
            strings(&["fxf", "forecast", "--offline"])
        );
        assert_eq!(rewrite_args(strings(&["fxf", "--help"])), strings(&["fxf", "--help"]));
    }
}
