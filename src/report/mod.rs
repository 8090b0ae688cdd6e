//! Reporting utilities: formatted terminal output.
//!
//! Formatting code lives in one place so the pipeline/model code stays
//! clean and output changes are localized.

mod format;

pub use format::{format_forecast, format_run_summary};
