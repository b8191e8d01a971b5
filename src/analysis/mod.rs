//! AI analysis: prompt construction, the model transport seam, and the client.

pub mod bedrock;
pub mod client;
pub mod prompt;

pub use bedrock::{BedrockInvoker, ModelInvoker};
pub use client::AnalysisClient;
