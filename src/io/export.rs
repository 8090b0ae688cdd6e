//! Export observed and forecast points to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::app::pipeline::RunOutput;
use crate::error::AppError;

/// Write one `kind,date,rate` row per observed and forecast point.
pub fn write_results_csv(path: &Path, run: &RunOutput) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create export CSV '{}': {e}", path.display())))?;

    writeln!(file, "kind,date,rate")
        .map_err(|e| AppError::io(format!("Failed to write export CSV header: {e}")))?;

    for p in &run.series {
        writeln!(file, "observed,{},{:.6}", p.date, p.rate)
            .map_err(|e| AppError::io(format!("Failed to write export CSV row: {e}")))?;
    }
    for p in &run.forecast {
        writeln!(file, "forecast,{},{:.6}", p.date, p.rate)
            .map_err(|e| AppError::io(format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}
