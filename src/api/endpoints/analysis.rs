//! Analysis endpoints and the shared analysis flow.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::AnalysisResult;
use crate::render::render_chart_svg;

#[derive(Deserialize)]
pub struct AnalysisRequest {
    pub transcript: String,
}

/// Run one analysis against the session and store the result.
///
/// The session's single analysis slot moves into the blocking task with the
/// outbound call, so it stays claimed until that call returns even if this
/// future is dropped. The result is stored by the same task. On any failure
/// the previous analysis is left untouched.
pub(crate) async fn run_analysis(
    ctx: &ApiContext,
    transcript: String,
) -> Result<AnalysisResult, ApiError> {
    let slot = ctx.session.begin_analysis()?;
    let playbook_names = ctx.session.playbook_names()?;

    tracing::info!(
        model = %ctx.analyzer.model_name(),
        playbooks = playbook_names.len(),
        transcript_chars = transcript.chars().count(),
        "Analysis started"
    );

    let analyzer = Arc::clone(&ctx.analyzer);
    tokio::task::spawn_blocking(move || -> Result<AnalysisResult, ApiError> {
        let result = analyzer.analyze(&transcript, &playbook_names)?;
        slot.session().set_analysis(result.clone())?;
        Ok(result)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Analysis task failed: {e}")))?
}

/// `POST /api/analysis`: analyse the given transcript.
pub async fn create(
    State(ctx): State<ApiContext>,
    Json(req): Json<AnalysisRequest>,
) -> Result<Json<AnalysisResult>, ApiError> {
    ctx.session.set_transcript(req.transcript.clone())?;
    let result = run_analysis(&ctx, req.transcript).await?;
    Ok(Json(result))
}

/// `GET /api/analysis`: the latest analysis.
pub async fn current(State(ctx): State<ApiContext>) -> Result<Json<AnalysisResult>, ApiError> {
    ctx.session
        .current_analysis()?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("No analysis yet".into()))
}

/// `GET /api/analysis/chart.svg`: the latest analysis as a standalone chart.
pub async fn chart_svg(State(ctx): State<ApiContext>) -> Result<impl IntoResponse, ApiError> {
    let analysis = ctx
        .session
        .current_analysis()?
        .ok_or_else(|| ApiError::NotFound("No analysis yet".into()))?;

    Ok((
        [(header::CONTENT_TYPE, "image/svg+xml")],
        render_chart_svg(&analysis.metrics, ctx.chart),
    ))
}
