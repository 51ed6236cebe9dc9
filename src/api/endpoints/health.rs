//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub model: String,
    pub playbooks: usize,
    pub has_transcript: bool,
    pub has_analysis: bool,
    pub analysis_running: bool,
}

/// `GET /api/health`: liveness plus a summary of the session.
pub async fn check(State(ctx): State<ApiContext>) -> Result<Json<HealthResponse>, ApiError> {
    Ok(Json(HealthResponse {
        status: "ok",
        version: crate::config::APP_VERSION,
        model: ctx.analyzer.model_name().to_string(),
        playbooks: ctx.session.playbook_count()?,
        has_transcript: ctx.session.has_transcript()?,
        has_analysis: ctx.session.current_analysis()?.is_some(),
        analysis_running: ctx.session.is_analyzing(),
    }))
}
