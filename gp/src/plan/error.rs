//! Caller-facing failure classification for the plan pipeline

use thiserror::Error;

use crate::llm::LlmError;

/// Every failure the pipeline can report
///
/// Display strings are safe to show to callers: they never contain the API
/// key or a raw upstream body. Raw text is kept in `ResponseFormat::raw` for logging.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("{0}")]
    BadInput(String),

    #[error("Server configuration error: {0}")]
    Configuration(String),

    #[error("LLM service unavailable: {message}")]
    Upstream { status: Option<u16>, message: String },

    #[error("LLM response was not a valid plan: {reason}")]
    ResponseFormat { reason: String, raw: String },

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl PlanError {
    /// Stable machine-readable name of the failure class
    pub fn kind(&self) -> &'static str {
        match self {
            PlanError::BadInput(_) => "bad_input",
            PlanError::Configuration(_) => "configuration",
            PlanError::Upstream { .. } => "upstream",
            PlanError::ResponseFormat { .. } => "response_format",
            PlanError::Unexpected(_) => "unexpected",
        }
    }

    /// True for failures caused by the caller rather than the server
    pub fn is_client_error(&self) -> bool {
        matches!(self, PlanError::BadInput(_))
    }

    /// Message for callers; server-internal causes are reduced to a generic message
    pub fn public_message(&self) -> String {
        match self {
            PlanError::Configuration(_) => {
                "Server is not configured to generate plans. Check server logs.".to_string()
            }
            PlanError::ResponseFormat { .. } => {
                "LLM service returned a response that is not a valid plan. Check server logs.".to_string()
            }
            PlanError::Unexpected(_) => "Unexpected server error. Check server logs.".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<LlmError> for PlanError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::ApiError { status, .. } => PlanError::Upstream {
                status: Some(status),
                message: format!("LLM service returned HTTP {}", status),
            },
            LlmError::Timeout(after) => PlanError::Upstream {
                status: None,
                message: format!("LLM service did not respond within {:?}", after),
            },
            LlmError::Network(e) if e.is_builder() => PlanError::Unexpected(format!("could not build request: {}", e)),
            LlmError::Network(e) if e.is_decode() => PlanError::ResponseFormat {
                reason: format!("could not decode response body: {}", e),
                raw: String::new(),
            },
            LlmError::Network(e) => PlanError::Upstream {
                status: e.status().map(|s| s.as_u16()),
                message: format!("could not reach LLM service: {}", e),
            },
            LlmError::InvalidResponse { reason, raw } => PlanError::ResponseFormat { reason, raw },
            LlmError::UnsupportedProvider(provider) => {
                PlanError::Configuration(format!("unsupported LLM provider '{}'", provider))
            }
        }
    }
}
