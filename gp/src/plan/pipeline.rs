//! PlanPipeline - goal in, plan out
//!
//! One linear pass per request: validate the goal, resolve credentials,
//! build the prompt, make exactly one LLM call, extract and sanitize the
//! reply, parse it into a `Plan`. Every failure leaves as a `PlanError`.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::error::PlanError;
use super::graph::check_dependencies;
use super::prompt::{DEFAULT_PROMPT_TEMPLATE, build_prompt, plan_response_schema};
use super::sanitize::strip_code_fence;
use super::task::Plan;
use crate::config::{Credentials, OutputMode};
use crate::llm::{GenerateRequest, GenerateResponse, LlmClient, LlmError};

/// Stateless plan generator shared by all requests
pub struct PlanPipeline {
    llm: Arc<dyn LlmClient>,
    credentials: Credentials,
    mode: OutputMode,
    template: String,
}

impl PlanPipeline {
    /// Create a pipeline using the default prompt template
    pub fn new(llm: Arc<dyn LlmClient>, credentials: Credentials, mode: OutputMode) -> Self {
        debug!(?mode, has_key = credentials.api_key().is_some(), "PlanPipeline::new: called");
        Self {
            llm,
            credentials,
            mode,
            template: DEFAULT_PROMPT_TEMPLATE.to_string(),
        }
    }

    /// Replace the default prompt template
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.api_key().is_some()
    }

    /// Turn a goal into a plan
    ///
    /// `goal` is `None` when the caller did not send one. `prompt_override`
    /// replaces the default template for this request only.
    pub async fn request_plan(&self, goal: Option<&str>, prompt_override: Option<&str>) -> Result<Plan, PlanError> {
        debug!(has_override = prompt_override.is_some(), "request_plan: called");
        let goal = validate_goal(goal)?;
        info!(%goal, "Received goal");

        let api_key = self.credentials.api_key().cloned().ok_or_else(|| {
            error!(api_key_env = %self.credentials.source(), "LLM API key is not set; cannot generate plan");
            PlanError::Configuration(format!("{} is not set", self.credentials.source()))
        })?;

        let template = match prompt_override {
            Some(t) if !t.trim().is_empty() => {
                debug!("request_plan: using prompt override");
                t
            }
            _ => self.template.as_str(),
        };

        let request = GenerateRequest {
            api_key,
            prompt: build_prompt(template, goal, self.mode),
            response_schema: (self.mode == OutputMode::Schema).then(plan_response_schema),
        };

        info!(mode = ?self.mode, "Requesting plan from LLM service");
        let envelope = self.llm.generate(request).await.map_err(log_llm_error)?;

        let plan = parse_envelope(&envelope)?;

        for issue in check_dependencies(&plan) {
            warn!(%issue, "Generated plan has a structural issue");
        }

        info!(task_count = plan.len(), "Plan generated");
        Ok(plan)
    }
}

/// Reject absent, empty and whitespace-only goals
///
/// An accepted goal is returned exactly as the caller sent it.
fn validate_goal(goal: Option<&str>) -> Result<&str, PlanError> {
    match goal {
        Some(g) if !g.trim().is_empty() => Ok(g),
        Some(_) => {
            debug!("validate_goal: empty goal");
            Err(PlanError::BadInput("'goal' must not be empty".to_string()))
        }
        None => {
            debug!("validate_goal: missing goal");
            Err(PlanError::BadInput("Missing 'goal' in request body".to_string()))
        }
    }
}

/// Classify an LLM failure and log what an operator needs to diagnose it
fn log_llm_error(err: LlmError) -> PlanError {
    let raw = err.raw_text().map(str::to_owned);
    let detail = err.to_string();
    let classified = PlanError::from(err);

    match &classified {
        PlanError::Upstream { status, .. } => {
            error!(
                status = *status,
                error = %detail,
                body = %raw.as_deref().unwrap_or(""),
                "LLM service request failed"
            );
        }
        PlanError::ResponseFormat { reason, raw } => {
            error!(%reason, %raw, "LLM service returned an unreadable response");
        }
        other => {
            error!(error = %detail, kind = other.kind(), "LLM call failed");
        }
    }
    classified
}

/// Extract the payload text from the envelope and parse it into a plan
fn parse_envelope(envelope: &GenerateResponse) -> Result<Plan, PlanError> {
    let text = envelope.first_text().map_err(|reason| {
        let raw = serde_json::to_string(envelope).unwrap_or_default();
        error!(%reason, %raw, "LLM response envelope is missing expected fields");
        PlanError::ResponseFormat { reason, raw }
    })?;

    let payload = strip_code_fence(text);
    Plan::from_json(payload).map_err(|reason| {
        error!(%reason, raw = %text, "Failed to decode plan JSON from LLM response");
        PlanError::ResponseFormat {
            reason,
            raw: text.to_string(),
        }
    })
}
