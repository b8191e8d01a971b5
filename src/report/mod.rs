//! Reporting: value formatting and the rendered series block.
//!
//! Formatting lives here so the fetch/decode code never deals with display
//! concerns.

pub mod format;

pub use format::format_value;

use crate::domain::Series;

pub const NO_DATA_MESSAGE: &str = "No data found for the specified parameters.";

/// Render a fetched series for display.
pub fn render_series(series: Option<&Series>, indicator_label: &str) -> String {
    let Some(series) = series.filter(|s| !s.is_empty()) else {
        return NO_DATA_MESSAGE.to_string();
    };

    let mut out = String::new();
    out.push_str(&format!(
        "Country: {}\n",
        series.subject_name.as_deref().unwrap_or("-")
    ));
    out.push_str(&format!("Indicator: {indicator_label}\n"));
    out.push_str(&"-".repeat(50));
    out.push_str("\n\n");

    for p in &series.points {
        out.push_str(&format!("{}: {}\n", p.period, format_value(p.value, indicator_label)));
    }

    out
}
