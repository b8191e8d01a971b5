//! Narrative analysis of a series through a hosted completion model.

use serde_json::Value;
use tracing::{info, warn};

use crate::analysis::bedrock::{BedrockInvoker, ModelInvoker};
use crate::analysis::prompt::{CompletionRequest, build_prompt};
use crate::config::Settings;
use crate::domain::{GenerationParams, Series};
use crate::error::AnalysisError;

/// Client for one model. Availability is fixed when the client is built.
pub struct AnalysisClient {
    invoker: Option<Box<dyn ModelInvoker>>,
    model_id: String,
    params: GenerationParams,
}

impl AnalysisClient {
    pub fn new(invoker: Box<dyn ModelInvoker>, model_id: impl Into<String>, params: GenerationParams) -> Self {
        Self {
            invoker: Some(invoker),
            model_id: model_id.into(),
            params,
        }
    }

    /// A client whose every call fails with `AnalysisError::Unavailable`.
    pub fn unavailable(model_id: impl Into<String>, params: GenerationParams) -> Self {
        Self {
            invoker: None,
            model_id: model_id.into(),
            params,
        }
    }

    /// Build the Bedrock-backed client from settings.
    ///
    /// Never fails: without a credential, or if the transport cannot be set up,
    /// the client is returned in the unavailable state.
    pub fn connect(settings: &Settings) -> Self {
        let Some(token) = settings.bedrock_token.as_deref() else {
            info!("AWS_BEARER_TOKEN_BEDROCK not set; AI analysis unavailable");
            return Self::unavailable(&settings.model_id, settings.generation);
        };
        match BedrockInvoker::new(&settings.bedrock_endpoint, token) {
            Ok(invoker) => Self::new(Box::new(invoker), &settings.model_id, settings.generation),
            Err(err) => {
                warn!(error = %err, "failed to initialize Bedrock; AI analysis unavailable");
                Self::unavailable(&settings.model_id, settings.generation)
            }
        }
    }

    pub fn is_available(&self) -> bool {
        self.invoker.is_some()
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn params(&self) -> GenerationParams {
        self.params
    }

    /// Ask `question` about `series` and return the trimmed completion.
    pub fn analyze(&self, series: &Series, question: &str, indicator_label: &str) -> Result<String, AnalysisError> {
        let Some(invoker) = self.invoker.as_deref() else {
            return Err(AnalysisError::Unavailable);
        };

        let prompt = build_prompt(series, question, indicator_label);
        let body = serde_json::to_vec(&CompletionRequest::new(&prompt, self.params))
            .map_err(|e| AnalysisError::InvalidResponse(format!("failed to encode request: {e}")))?;

        info!(
            model = %self.model_id,
            max_tokens = self.params.max_tokens,
            temperature = self.params.temperature,
            "requesting analysis"
        );
        let raw = invoker.invoke(&self.model_id, body)?;
        extract_completion(&raw)
    }
}

/// Read and trim the `completion` field of a response body.
pub fn extract_completion(raw: &[u8]) -> Result<String, AnalysisError> {
    let text = std::str::from_utf8(raw)
        .map_err(|e| AnalysisError::InvalidResponse(format!("response is not UTF-8: {e}")))?;
    let body: Value =
        serde_json::from_str(text).map_err(|e| AnalysisError::InvalidResponse(format!("response is not JSON: {e}")))?;
    match body.get("completion") {
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        _ => Err(AnalysisError::MissingCompletion),
    }
}
