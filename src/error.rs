//! Error types.
//!
//! The pipeline stages return typed errors (`TransportError`, `DecodeError`,
//! `AnalysisError`). `AppError` is the binary-level error: a message plus the
//! process exit code. Every typed error converts into one.

use thiserror::Error;

/// Exit codes used by `wbi`.
pub mod exit_codes {
    /// Terminal, worker pool or local file failures.
    pub const RUNTIME: u8 = 1;
    pub const USAGE: u8 = 2;
    pub const ANALYSIS: u8 = 3;
    pub const TRANSPORT: u8 = 4;
    pub const DECODE: u8 = 5;
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(exit_codes::USAGE, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Failure to obtain a response body from the statistics provider.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("invalid request URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("request failed: {0}")]
    Connection(String),
    #[error("HTTP error code: {status_code}")]
    Status { status_code: u16 },
}

/// Malformed provider response. `path` locates the offending fragment
/// (`$`, `$[1]`, `$[1][0].country.value`, ...).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message} (at {path})")]
pub struct DecodeError {
    pub path: String,
    pub message: String,
}

impl DecodeError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Either half of a fetch-and-decode call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("service unavailable")]
    Unavailable,
    #[error("model request failed: {0}")]
    Transport(String),
    #[error("model endpoint returned status {status_code}: {body}")]
    Status { status_code: u16, body: String },
    #[error("invalid model response: {0}")]
    InvalidResponse(String),
    #[error("model response has no 'completion' field")]
    MissingCompletion,
}

impl From<TransportError> for AppError {
    fn from(err: TransportError) -> Self {
        AppError::new(exit_codes::TRANSPORT, format!("Error fetching data: {err}"))
    }
}

impl From<DecodeError> for AppError {
    fn from(err: DecodeError) -> Self {
        AppError::new(exit_codes::DECODE, format!("Error decoding World Bank response: {err}"))
    }
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Transport(e) => e.into(),
            FetchError::Decode(e) => e.into(),
        }
    }
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        AppError::new(exit_codes::ANALYSIS, format!("Error during AI analysis: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_errors_map_to_exit_codes() {
        let e: AppError = TransportError::Status { status_code: 503 }.into();
        assert_eq!(e.exit_code(), exit_codes::TRANSPORT);
        assert!(e.message().contains("503"));

        let e: AppError = FetchError::from(DecodeError::new("$[1]", "expected array")).into();
        assert_eq!(e.exit_code(), exit_codes::DECODE);
        assert!(e.message().contains("$[1]"));

        let e: AppError = AnalysisError::Unavailable.into();
        assert_eq!(e.exit_code(), exit_codes::ANALYSIS);
        assert!(e.message().contains("service unavailable"));
    }
}
