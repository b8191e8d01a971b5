//! Export a fetched series to CSV.
//!
//! One row per point in series order; periods without a measurement get an
//! empty `value` cell.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::Series;
use crate::error::{AppError, exit_codes};

/// Write `series` to a CSV file.
pub fn write_series_csv(path: &Path, series: &Series, indicator_code: &str) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(exit_codes::RUNTIME, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_series(file, series, indicator_code)
        .map_err(|e| AppError::new(exit_codes::RUNTIME, format!("Failed to write export CSV '{}': {e}", path.display())))
}

fn write_series<W: Write>(mut out: W, series: &Series, indicator_code: &str) -> std::io::Result<()> {
    writeln!(out, "country,indicator,period,value")?;
    let country = csv_field(series.subject_name.as_deref().unwrap_or(""));
    let indicator = csv_field(indicator_code);
    for p in &series.points {
        writeln!(
            out,
            "{country},{indicator},{},{}",
            csv_field(&p.period),
            p.value.map(|v| v.to_string()).unwrap_or_default(),
        )?;
    }
    Ok(())
}

fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}
