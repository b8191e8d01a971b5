//! Runtime settings.
//!
//! Values come from the process environment (after loading `.env` with
//! dotenvy). CLI flags override them in `app`.
//!
//! | variable                   | default                                           |
//! |----------------------------|---------------------------------------------------|
//! | `WB_BASE_URL`              | `https://api.worldbank.org/v2/country`            |
//! | `AWS_REGION`               | `us-east-1`                                       |
//! | `BEDROCK_ENDPOINT`         | `https://bedrock-runtime.{AWS_REGION}.amazonaws.com` |
//! | `AWS_BEARER_TOKEN_BEDROCK` | unset (analysis unavailable)                      |
//! | `BEDROCK_MODEL_ID`         | `anthropic.claude-v2`                             |
//! | `BEDROCK_MAX_TOKENS`       | `500`                                             |
//! | `BEDROCK_TEMPERATURE`      | `0.7`                                             |

use crate::data::DEFAULT_BASE_URL;
use crate::domain::GenerationParams;
use crate::error::AppError;

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_MODEL_ID: &str = "anthropic.claude-v2";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub worldbank_base_url: String,
    pub bedrock_endpoint: String,
    /// Bedrock API key. `None` leaves analysis unavailable.
    pub bedrock_token: Option<String>,
    pub model_id: String,
    pub generation: GenerationParams,
}

impl Settings {
    /// Load `.env` (if present) and read settings from the environment.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings through `lookup`; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let region = get("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string());
        let bedrock_endpoint = get("BEDROCK_ENDPOINT")
            .unwrap_or_else(|| format!("https://bedrock-runtime.{region}.amazonaws.com"));

        let defaults = GenerationParams::default();
        let max_tokens = match get("BEDROCK_MAX_TOKENS") {
            Some(raw) => raw
                .parse::<u32>()
                .map_err(|e| AppError::usage(format!("Invalid BEDROCK_MAX_TOKENS '{raw}': {e}")))?,
            None => defaults.max_tokens,
        };
        let temperature = match get("BEDROCK_TEMPERATURE") {
            Some(raw) => parse_temperature(&raw)
                .map_err(|e| AppError::usage(format!("Invalid BEDROCK_TEMPERATURE '{raw}': {e}")))?,
            None => defaults.temperature,
        };

        Ok(Self {
            worldbank_base_url: get("WB_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            bedrock_endpoint,
            bedrock_token: get("AWS_BEARER_TOKEN_BEDROCK"),
            model_id: get("BEDROCK_MODEL_ID").unwrap_or_else(|| DEFAULT_MODEL_ID.to_string()),
            generation: GenerationParams {
                max_tokens,
                temperature,
            },
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            worldbank_base_url: DEFAULT_BASE_URL.to_string(),
            bedrock_endpoint: format!("https://bedrock-runtime.{DEFAULT_REGION}.amazonaws.com"),
            bedrock_token: None,
            model_id: DEFAULT_MODEL_ID.to_string(),
            generation: GenerationParams::default(),
        }
    }
}

/// Parse a sampling temperature; must be finite and within `0.0..=1.0`.
pub fn parse_temperature(raw: &str) -> Result<f64, String> {
    let t: f64 = raw.trim().parse().map_err(|_| "not a number".to_string())?;
    if !t.is_finite() || !(0.0..=1.0).contains(&t) {
        return Err("expected a value between 0.0 and 1.0".to_string());
    }
    Ok(t)
}
