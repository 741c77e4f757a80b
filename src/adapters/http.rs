use crate::core::planner::PlanHandler;
use crate::utils::error::PlannerError;
use crate::utils::validation::{FieldViolation, ValidationError};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub const GENERATE_PLAN_PATH: &str = "/api/generate-plan";

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

pub struct AppError(PlannerError);

impl From<PlannerError> for AppError {
    fn from(err: PlannerError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.0.to_response_body())).into_response()
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(handler: Arc<PlanHandler>) -> Router {
    Router::new()
        .route(GENERATE_PLAN_PATH, post(generate_plan))
        .layer(CorsLayer::permissive())
        .with_state(handler)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn generate_plan(
    State(handler): State<Arc<PlanHandler>>,
    body: Bytes,
) -> Result<Response, AppError> {
    let payload = parse_body(&body)?;
    let plan = handler.generate_plan(&payload).await?;
    Ok(Json(plan).into_response())
}

/// 請求主體不是 JSON 時視為驗證失敗，而不是交給 axum 預設的拒絕回應
pub fn parse_body(body: &[u8]) -> Result<serde_json::Value, PlannerError> {
    serde_json::from_slice(body).map_err(|_| {
        PlannerError::InvalidRequest(ValidationError::new(vec![FieldViolation::new(
            "body",
            "Request body must be valid JSON",
        )]))
    })
}
