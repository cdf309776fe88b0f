//! LLM request/response types for goalplan
//!
//! The response side models the Gemini `generateContent` envelope. Every field
//! is optional on the wire; `GenerateResponse::first_text` is the one place
//! that decides whether the envelope has the shape we need.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// API key for the LLM service
///
/// Debug output is redacted so the key never ends up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// A single generation request - everything needed for one LLM call
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Credential for this call
    pub api_key: ApiKey,

    /// Final prompt text, goal already substituted
    pub prompt: String,

    /// JSON schema the service should constrain its output to (schema mode only)
    pub response_schema: Option<serde_json::Value>,
}

/// Top-level `generateContent` response envelope
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<Candidate>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<PromptFeedback>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<UsageMetadata>,
}

/// One generated candidate
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<CandidateContent>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parts: Option<Vec<Part>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Safety feedback on the prompt; `block_reason` is set when nothing was generated
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<String>,
}

/// Token accounting
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u64,

    #[serde(default)]
    pub candidates_token_count: u64,

    #[serde(default)]
    pub total_token_count: u64,
}

impl GenerateResponse {
    /// Build an envelope holding a single candidate with one text part
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            candidates: Some(vec![Candidate {
                content: Some(CandidateContent {
                    parts: Some(vec![Part { text: Some(text.into()) }]),
                    role: Some("model".to_string()),
                }),
                finish_reason: Some("STOP".to_string()),
            }]),
            prompt_feedback: None,
            usage_metadata: None,
        }
    }

    /// Extract the first candidate's first text part
    ///
    /// Returns a description of what is missing when the envelope has the wrong shape.
    pub fn first_text(&self) -> Result<&str, String> {
        debug!("GenerateResponse::first_text: called");
        let candidates = match self.candidates.as_deref() {
            Some(c) if !c.is_empty() => c,
            _ => {
                debug!("GenerateResponse::first_text: no candidates");
                return Err(match self.prompt_feedback.as_ref().and_then(|f| f.block_reason.as_deref()) {
                    Some(reason) => format!("response contained no candidates (prompt blocked: {})", reason),
                    None => "response contained no candidates".to_string(),
                });
            }
        };

        let candidate = &candidates[0];
        let content = candidate.content.as_ref().ok_or_else(|| match candidate.finish_reason.as_deref() {
            Some(reason) => format!("first candidate has no content (finish reason: {})", reason),
            None => "first candidate has no content".to_string(),
        })?;

        let part = content
            .parts
            .as_deref()
            .and_then(|parts| parts.first())
            .ok_or_else(|| "first candidate has no content parts".to_string())?;

        part.text
            .as_deref()
            .ok_or_else(|| "first content part has no text".to_string())
    }
}
