//! API routes for goalplan

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::AppState;
use crate::plan::{Plan, PlanError};

type AppStateArc = Arc<AppState>;

/// Path of the plan generation endpoint
pub const GENERATE_PLAN_PATH: &str = "/api/generate-plan";

/// Body of a plan generation request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePlanRequest {
    pub goal: Option<String>,
    pub prompt_override: Option<String>,
}

/// Body of every error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub credentials: bool,
    pub uptime_secs: u64,
}

pub fn plan_routes() -> Router<AppStateArc> {
    Router::new().route(GENERATE_PLAN_PATH, post(generate_plan))
}

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/health", get(health))
}

async fn generate_plan(
    State(state): State<AppStateArc>,
    payload: Result<Json<GeneratePlanRequest>, JsonRejection>,
) -> Result<Json<Plan>, PlanError> {
    let Json(req) = payload.map_err(|rejection| {
        debug!(error = %rejection, "generate_plan: rejected body");
        PlanError::BadInput(format!(
            "Request body must be a JSON object with a string 'goal': {}",
            rejection.body_text()
        ))
    })?;

    let plan = state
        .pipeline
        .request_plan(req.goal.as_deref(), req.prompt_override.as_deref())
        .await?;

    Ok(Json(plan))
}

async fn health(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        credentials: state.pipeline.has_credentials(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// HTTP status for each failure class
pub fn status_for(err: &PlanError) -> StatusCode {
    match err {
        PlanError::BadInput(_) => StatusCode::BAD_REQUEST,
        PlanError::Configuration(_) | PlanError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        PlanError::Upstream { .. } | PlanError::ResponseFormat { .. } => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for PlanError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        if !self.is_client_error() {
            warn!(kind = self.kind(), %status, "Plan request failed");
        }
        let body = ErrorBody {
            error: self.public_message(),
            kind: self.kind().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(&PlanError::BadInput("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(&PlanError::Configuration("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_for(&PlanError::Unexpected("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_for(&PlanError::Upstream {
                status: Some(503),
                message: "x".into()
            }),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&PlanError::ResponseFormat {
                reason: "x".into(),
                raw: "y".into()
            }),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_request_body_field_names() {
        let req: GeneratePlanRequest =
            serde_json::from_str(r#"{"goal": "Run a marathon", "promptOverride": "Go: {goal_text}"}"#).unwrap();
        assert_eq!(req.goal.as_deref(), Some("Run a marathon"));
        assert_eq!(req.prompt_override.as_deref(), Some("Go: {goal_text}"));

        let req: GeneratePlanRequest = serde_json::from_str("{}").unwrap();
        assert!(req.goal.is_none());
    }
}
