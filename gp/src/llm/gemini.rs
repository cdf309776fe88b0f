//! Google Gemini API client implementation
//!
//! Implements the LlmClient trait for the `generateContent` endpoint.
//! One request per call: there is no retry loop.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

use super::{GenerateRequest, GenerateResponse, LlmClient, LlmError};
use crate::config::LlmConfig;

/// Header carrying the API key; keeps the key out of request URLs and error messages
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini API client
pub struct GeminiClient {
    model: String,
    base_url: String,
    http: Client,
    timeout: Duration,
}

impl GeminiClient {
    /// Create a new client from configuration
    ///
    /// The API key is not part of the client; it travels with each request.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        debug!(?config, "from_config: called");
        let timeout = Duration::from_millis(config.timeout_ms);

        let http = Client::builder().timeout(timeout).build().map_err(LlmError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            timeout,
        })
    }

    /// Endpoint for the configured model
    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Build the request body for the Gemini API
    fn build_request_body(&self, request: &GenerateRequest) -> serde_json::Value {
        debug!(%self.model, prompt_len = request.prompt.len(), "build_request_body: called");
        let mut body = serde_json::json!({
            "contents": [
                { "parts": [ { "text": request.prompt } ] }
            ],
        });

        if let Some(schema) = &request.response_schema {
            debug!("build_request_body: schema-constrained output");
            body["generationConfig"] = serde_json::json!({
                "responseMimeType": "application/json",
                "responseSchema": schema,
            });
        } else {
            debug!("build_request_body: free-form output");
        }

        body
    }

    /// Classify a transport-level failure
    fn classify_send_error(&self, err: reqwest::Error) -> LlmError {
        if err.is_timeout() {
            debug!("classify_send_error: timeout");
            LlmError::Timeout(self.timeout)
        } else {
            debug!(error = %err, "classify_send_error: network error");
            LlmError::Network(err.without_url())
        }
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, LlmError> {
        debug!(%self.model, "generate: called");
        let body = self.build_request_body(&request);

        info!(model = %self.model, schema = request.response_schema.is_some(), "generate: calling LLM service");
        let response = self
            .http
            .post(self.endpoint())
            .header(API_KEY_HEADER, request.api_key.expose())
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify_send_error(e))?;

        let status = response.status().as_u16();

        if !response.status().is_success() {
            debug!(%status, "generate: API error");
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError { status, message: text });
        }

        let text = response.text().await.map_err(|e| self.classify_send_error(e))?;
        debug!(%status, body_len = text.len(), "generate: success");

        serde_json::from_str::<GenerateResponse>(&text).map_err(|e| {
            debug!(error = %e, "generate: envelope is not valid JSON");
            LlmError::invalid_response(format!("response body is not a valid JSON envelope: {}", e), text)
        })
    }
}
