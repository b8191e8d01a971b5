//! Prompt construction for the completion endpoint.

use serde::Serialize;

use crate::domain::{GenerationParams, Series};

/// Text-completion request body.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest<'a> {
    pub prompt: &'a str,
    pub max_tokens_to_sample: u32,
    pub temperature: f64,
}

impl<'a> CompletionRequest<'a> {
    pub fn new(prompt: &'a str, params: GenerationParams) -> Self {
        Self {
            prompt,
            max_tokens_to_sample: params.max_tokens,
            temperature: params.temperature,
        }
    }
}

/// Data summary embedded in the prompt: subject, indicator, then one
/// `period: value` line per measured point. Unmeasured periods are left out.
pub fn data_summary(series: &Series, indicator_label: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Country: {}\n",
        series.subject_name.as_deref().unwrap_or("Unknown")
    ));
    out.push_str(&format!("Indicator: {indicator_label}\n\n"));
    for (period, value) in series.measured() {
        out.push_str(&format!("{period}: {value}\n"));
    }
    out
}

/// Single-turn prompt: data first, then the question, then the `Assistant:` cue.
pub fn build_prompt(series: &Series, question: &str, indicator_label: &str) -> String {
    format!(
        "\n\nHuman: I have the following World Bank data:\n\n{}\n\nUser Question: {}\n\n\
         Please provide a clear, insightful analysis based on this data.\n\nAssistant:",
        data_summary(series, indicator_label),
        question
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DataPoint;

    fn sample() -> Series {
        Series {
            subject_name: Some("Germany".to_string()),
            points: vec![
                DataPoint::new("2022", None),
                DataPoint::new("2021", Some(3.1)),
                DataPoint::new("2020", Some(0.0)),
            ],
            page: None,
        }
    }

    #[test]
    fn summary_omits_missing_values() {
        let summary = data_summary(&sample(), "Inflation, consumer prices (annual %)");
        assert!(summary.starts_with("Country: Germany\nIndicator: Inflation, consumer prices (annual %)\n\n"));
        assert!(summary.contains("2021: 3.1\n"));
        assert!(summary.contains("2020: 0\n"));
        assert!(!summary.contains("2022"));
        assert!(!summary.contains("No data"));
    }

    #[test]
    fn prompt_puts_data_before_question_and_ends_with_cue() {
        let prompt = build_prompt(&sample(), "Is inflation rising?", "Inflation");
        let data_at = prompt.find("2021: 3.1").unwrap();
        let question_at = prompt.find("User Question: Is inflation rising?").unwrap();
        assert!(data_at < question_at);
        assert!(prompt.starts_with("\n\nHuman:"));
        assert!(prompt.ends_with("\n\nAssistant:"));
    }

    #[test]
    fn request_body_field_names() {
        let params = GenerationParams { max_tokens: 300, temperature: 0.25 };
        let body = serde_json::to_value(CompletionRequest::new("hi", params)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"prompt": "hi", "max_tokens_to_sample": 300, "temperature": 0.25})
        );
    }
}
