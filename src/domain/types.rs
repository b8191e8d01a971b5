//! Shared domain types.
//!
//! A `Series` is built fresh by the decoder for every fetch and is then only
//! read: by the formatter for display, by the analysis client for prompting,
//! and by the CSV export.

use serde::{Deserialize, Serialize};

/// One observation: the provider's period label and its value, if measured.
///
/// `value` is `None` when the provider reported no measurement for the period,
/// which is distinct from a measured `Some(0.0)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Raw period label (usually a 4-digit year). Never empty.
    pub period: String,
    pub value: Option<f64>,
}

impl DataPoint {
    pub fn new(period: impl Into<String>, value: Option<f64>) -> Self {
        Self {
            period: period.into(),
            value,
        }
    }
}

/// Pagination metadata from the first element of a provider response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub page: u32,
    pub pages: u32,
    pub per_page: u32,
    pub total: u32,
}

impl PageInfo {
    /// True when the provider had more rows than this response carries.
    pub fn is_truncated(&self) -> bool {
        self.pages > 1
    }
}

/// Observations for one subject/indicator pair, newest period first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub subject_name: Option<String>,
    pub points: Vec<DataPoint>,
    pub page: Option<PageInfo>,
}

impl Series {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points that carry a measurement.
    pub fn measured(&self) -> impl Iterator<Item = (&str, f64)> {
        self.points
            .iter()
            .filter_map(|p| p.value.map(|v| (p.period.as_str(), v)))
    }
}

/// Parameters of a single fetch.
///
/// `country` and `indicator` are provider codes (`GBR`, `NY.GDP.MKTP.CD`);
/// display names are resolved through the `Catalog` before a query is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesQuery {
    pub country: String,
    pub indicator: String,
    pub start_year: i32,
    pub end_year: i32,
}

impl SeriesQuery {
    pub fn new(
        country: impl Into<String>,
        indicator: impl Into<String>,
        start_year: i32,
        end_year: i32,
    ) -> Self {
        Self {
            country: country.into(),
            indicator: indicator.into(),
            start_year,
            end_year,
        }
    }
}

pub const DEFAULT_MAX_TOKENS: u32 = 500;
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Generation knobs sent with every completion request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Upper bound on generated tokens (`max_tokens_to_sample`).
    pub max_tokens: u32,
    pub temperature: f64,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}
