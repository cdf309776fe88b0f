//! LLM error types

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during LLM operations
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Invalid response: {reason}")]
    InvalidResponse { reason: String, raw: String },

    #[error("Unsupported LLM provider: '{0}'. Supported: gemini")]
    UnsupportedProvider(String),
}

impl LlmError {
    /// Build an InvalidResponse error that keeps the offending text for diagnostics
    pub fn invalid_response(reason: impl Into<String>, raw: impl Into<String>) -> Self {
        LlmError::InvalidResponse {
            reason: reason.into(),
            raw: raw.into(),
        }
    }

    /// HTTP status reported by the upstream service, if the request got that far
    pub fn status(&self) -> Option<u16> {
        match self {
            LlmError::ApiError { status, .. } => Some(*status),
            LlmError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Raw response text attached to this error, if any
    pub fn raw_text(&self) -> Option<&str> {
        match self {
            LlmError::ApiError { message, .. } => Some(message),
            LlmError::InvalidResponse { raw, .. } => Some(raw),
            _ => None,
        }
    }
}
