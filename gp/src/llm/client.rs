//! LlmClient trait definition

use async_trait::async_trait;

use super::{GenerateRequest, GenerateResponse, LlmError};

/// Stateless LLM client - each call is independent
///
/// Implementations make exactly one outbound request per call and never retry.
/// A non-2xx reply is an `ApiError`; a 2xx reply whose body is not a JSON
/// envelope is an `InvalidResponse` carrying the raw body.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single generation request and return the decoded envelope
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, LlmError>;
}
