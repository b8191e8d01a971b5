//! Shared fetch/analyze workflow used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! validate -> fetch -> decode -> (render) -> (analyze)
//!
//! Both front-ends call these with codes already resolved through the catalog.

use chrono::{Datelike, Local};

use crate::analysis::AnalysisClient;
use crate::data::WorldBankClient;
use crate::domain::{Series, SeriesQuery};
use crate::error::{AnalysisError, AppError, FetchError};

pub const MIN_YEAR: i32 = 1960;

pub const ANALYSIS_NOT_CONFIGURED: &str =
    "AWS Bedrock is not configured. Please set AWS_BEARER_TOKEN_BEDROCK to use AI analysis.";

/// Latest year a query may name.
pub fn max_year() -> i32 {
    Local::now().year()
}

/// Reject year ranges before they reach the fetcher.
pub fn validate_years(start_year: i32, end_year: i32) -> Result<(), AppError> {
    let max = max_year();
    for (label, year) in [("Start", start_year), ("End", end_year)] {
        if !(MIN_YEAR..=max).contains(&year) {
            return Err(AppError::usage(format!(
                "{label} year {year} is outside {MIN_YEAR}..={max}"
            )));
        }
    }
    if start_year > end_year {
        return Err(AppError::usage("Start year must be before end year"));
    }
    Ok(())
}

/// Outcome of one fetch, with the label it should be displayed under.
#[derive(Debug, Clone)]
pub struct FetchOutput {
    pub query: SeriesQuery,
    pub indicator_label: String,
    pub series: Option<Series>,
}

pub fn run_fetch(
    client: &WorldBankClient,
    query: SeriesQuery,
    indicator_label: impl Into<String>,
) -> Result<FetchOutput, FetchError> {
    let series = client.fetch_series(&query)?;
    Ok(FetchOutput {
        query,
        indicator_label: indicator_label.into(),
        series,
    })
}

/// What to show in the analysis pane for a given question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisPlan {
    /// Empty question: nothing to do.
    Skip,
    /// A question was asked but the model is not configured.
    NotConfigured,
    /// The fetch returned no measured points.
    NoData,
    Ask(String),
}

pub const NO_DATA_TO_ANALYZE: &str = "No data to analyze for the specified parameters.";

pub fn plan_analysis(client: &AnalysisClient, output: &FetchOutput, question: &str) -> AnalysisPlan {
    let question = question.trim();
    if question.is_empty() {
        AnalysisPlan::Skip
    } else if !client.is_available() {
        AnalysisPlan::NotConfigured
    } else if output.series.as_ref().is_none_or(|s| s.measured().next().is_none()) {
        AnalysisPlan::NoData
    } else {
        AnalysisPlan::Ask(question.to_string())
    }
}

/// Ask the model about a fetched series. Call only after `plan_analysis`
/// returned `Ask`.
pub fn run_analysis(
    client: &AnalysisClient,
    output: &FetchOutput,
    question: &str,
) -> Result<String, AnalysisError> {
    let series = output.series.clone().unwrap_or_default();
    client.analyze(&series, question, &output.indicator_label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ModelInvoker;
    use crate::domain::{DataPoint, GenerationParams};

    #[test]
    fn year_validation() {
        assert!(validate_years(2020, 2023).is_ok());
        assert!(validate_years(2020, 2020).is_ok());

        let err = validate_years(2023, 2020).unwrap_err();
        assert_eq!(err.message(), "Start year must be before end year");
        assert_eq!(err.exit_code(), crate::error::exit_codes::USAGE);

        assert!(validate_years(1959, 2000).is_err());
        assert!(validate_years(2000, max_year() + 1).is_err());
    }

    struct NeverInvoked;

    impl ModelInvoker for NeverInvoked {
        fn invoke(&self, _model_id: &str, _body: Vec<u8>) -> Result<Vec<u8>, AnalysisError> {
            Err(AnalysisError::Transport("not expected in this test".to_string()))
        }
    }

    fn output(series: Option<Series>) -> FetchOutput {
        FetchOutput {
            query: SeriesQuery::new("GBR", "NY.GDP.MKTP.CD", 2020, 2021),
            indicator_label: "GDP (current US$)".to_string(),
            series,
        }
    }

    fn measured_series() -> Series {
        Series {
            subject_name: Some("United Kingdom".to_string()),
            points: vec![DataPoint::new("2021", Some(3.13e12)), DataPoint::new("2020", None)],
            page: None,
        }
    }

    #[test]
    fn analysis_plan() {
        let unavailable = AnalysisClient::unavailable("m", GenerationParams::default());
        let fetched = output(Some(measured_series()));
        assert_eq!(plan_analysis(&unavailable, &fetched, "   "), AnalysisPlan::Skip);
        assert_eq!(plan_analysis(&unavailable, &fetched, "Why?"), AnalysisPlan::NotConfigured);
    }

    #[test]
    fn available_client_asks_with_trimmed_question() {
        let available = AnalysisClient::new(Box::new(NeverInvoked), "m", GenerationParams::default());
        let fetched = output(Some(measured_series()));
        assert_eq!(
            plan_analysis(&available, &fetched, "  Is GDP growing?\n"),
            AnalysisPlan::Ask("Is GDP growing?".to_string())
        );
        assert_eq!(plan_analysis(&available, &fetched, " "), AnalysisPlan::Skip);
    }

    #[test]
    fn missing_or_unmeasured_series_is_not_analyzed() {
        let available = AnalysisClient::new(Box::new(NeverInvoked), "m", GenerationParams::default());
        assert_eq!(plan_analysis(&available, &output(None), "Why?"), AnalysisPlan::NoData);

        let all_null = Series {
            subject_name: Some("United Kingdom".to_string()),
            points: vec![DataPoint::new("2021", None)],
            page: None,
        };
        assert_eq!(plan_analysis(&available, &output(Some(all_null)), "Why?"), AnalysisPlan::NoData);
    }
}
