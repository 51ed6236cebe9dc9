//! HTML views for the dashboard and the analyze form.

use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;

use super::analysis::run_analysis;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::render::{render_analyze_page, render_dashboard_page, Notice};

#[derive(Deserialize)]
pub struct AnalyzeForm {
    #[serde(default)]
    pub transcript: String,
}

/// `GET /`
pub async fn index(State(ctx): State<ApiContext>) -> Result<Html<String>, ApiError> {
    let analysis = ctx.session.current_analysis()?;
    Ok(Html(render_dashboard_page(analysis.as_ref(), ctx.chart)))
}

/// `GET /analyze`
pub async fn analyze_page(State(ctx): State<ApiContext>) -> Result<Html<String>, ApiError> {
    let transcript = ctx.session.transcript()?;
    let playbooks = ctx.session.playbook_count()?;
    Ok(Html(render_analyze_page(&transcript, playbooks, None)))
}

/// `POST /analyze`: run the analysis, then show the dashboard.
///
/// Failures re-render the form with the error and its status; the dashboard
/// keeps showing the previous analysis.
pub async fn submit_analysis(
    State(ctx): State<ApiContext>,
    Form(form): Form<AnalyzeForm>,
) -> Result<Response, ApiError> {
    ctx.session.set_transcript(form.transcript.clone())?;

    match run_analysis(&ctx, form.transcript.clone()).await {
        Ok(_) => Ok(Redirect::to("/").into_response()),
        Err(err) => {
            tracing::warn!(code = err.code(), error = %err, "Analysis failed");
            let notice = Notice::error(format!(
                "Could not analyse the meeting: {}",
                err.public_message()
            ));
            let html = render_analyze_page(
                &form.transcript,
                ctx.session.playbook_count()?,
                Some(&notice),
            );
            Ok((err.status_code(), Html(html)).into_response())
        }
    }
}
