//! Hosted model transport.
//!
//! `ModelInvoker` is the single operation the analysis client needs from a
//! provider: send a UTF-8 JSON body to a model and get the response body back.
//! `BedrockInvoker` implements it against the Bedrock runtime `InvokeModel`
//! REST endpoint using API-key (bearer token) auth.

use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use tracing::debug;

use crate::error::AnalysisError;

pub trait ModelInvoker: Send + Sync {
    fn invoke(&self, model_id: &str, body: Vec<u8>) -> Result<Vec<u8>, AnalysisError>;
}

pub struct BedrockInvoker {
    client: Client,
    endpoint: Url,
    token: String,
}

impl BedrockInvoker {
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Result<Self, AnalysisError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(AnalysisError::Transport("Bedrock API key cannot be empty".to_string()));
        }
        let endpoint = endpoint.into();
        let endpoint = Url::parse(&endpoint)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| AnalysisError::Transport(format!("invalid Bedrock endpoint '{endpoint}'")))?;
        let client = Client::builder()
            .build()
            .map_err(|e| AnalysisError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint,
            token,
        })
    }

    /// `{endpoint}/model/{model_id}/invoke`, with the model id as one
    /// percent-encoded segment (inference-profile ARNs contain `/`).
    pub fn invoke_url(&self, model_id: &str) -> Url {
        let mut url = self.endpoint.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("model").push(model_id).push("invoke");
        }
        url
    }
}

impl ModelInvoker for BedrockInvoker {
    fn invoke(&self, model_id: &str, body: Vec<u8>) -> Result<Vec<u8>, AnalysisError> {
        let url = self.invoke_url(model_id);
        debug!(%url, bytes = body.len(), "invoking model");

        let resp = self
            .client
            .post(url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .map_err(|e| AnalysisError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(AnalysisError::Status {
                status_code: status.as_u16(),
                body,
            });
        }

        resp.bytes()
            .map(|b| b.to_vec())
            .map_err(|e| AnalysisError::Transport(format!("failed to read response body: {e}")))
    }
}
