//! Playbook upload, listing and removal.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, Redirect};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::{is_pdf_upload, Playbook};
use crate::render::{render_playbooks_page, Notice};

/// Outcome of the last upload, carried through the redirect.
#[derive(Debug, Default, Deserialize)]
pub struct UploadSummary {
    pub added: Option<usize>,
    pub skipped: Option<usize>,
}

impl UploadSummary {
    fn notice(&self) -> Option<Notice> {
        match (self.added.unwrap_or(0), self.skipped.unwrap_or(0)) {
            (0, 0) => None,
            (added, 0) => Some(Notice::info(format!("Uploaded {added} playbook(s)."))),
            (added, skipped) => Some(Notice::error(format!(
                "Uploaded {added} playbook(s). Skipped {skipped} file(s) that are not PDFs."
            ))),
        }
    }
}

/// `GET /playbooks`
pub async fn page(
    State(ctx): State<ApiContext>,
    Query(summary): Query<UploadSummary>,
) -> Result<Html<String>, ApiError> {
    let playbooks = ctx.session.playbooks()?;
    Ok(Html(render_playbooks_page(
        &playbooks,
        summary.notice().as_ref(),
    )))
}

/// `POST /playbooks`: accept every PDF part, skip the rest.
pub async fn upload(
    State(ctx): State<ApiContext>,
    mut multipart: Multipart,
) -> Result<Redirect, ApiError> {
    let mut added = 0usize;
    let mut skipped = 0usize;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid upload: {e}")))?
    {
        // Browsers send an empty file part when nothing was selected
        let filename = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => continue,
        };
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(|e| {
            tracing::warn!("Failed to read upload bytes: {e}");
            ApiError::BadRequest("Failed to read file data.".into())
        })?;

        if is_pdf_upload(content_type.as_deref(), &filename, &bytes) {
            ctx.session.add_playbook(Playbook::new(filename, bytes.to_vec()))?;
            added += 1;
        } else {
            tracing::warn!(
                filename = %filename,
                content_type = content_type.as_deref().unwrap_or("none"),
                "Skipped non-PDF playbook upload"
            );
            skipped += 1;
        }
    }

    Ok(Redirect::to(&format!(
        "/playbooks?added={added}&skipped={skipped}"
    )))
}

/// `POST /playbooks/:id/delete`: form-friendly removal.
pub async fn delete_form(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
) -> Result<Redirect, ApiError> {
    ctx.session.remove_playbook(id)?;
    Ok(Redirect::to("/playbooks"))
}

/// `GET /api/playbooks`
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<Playbook>>, ApiError> {
    Ok(Json(ctx.session.playbooks()?))
}

/// `DELETE /api/playbooks/:id`
pub async fn delete(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    ctx.session.remove_playbook(id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_summary_no_notice() {
        assert!(UploadSummary::default().notice().is_none());
    }

    #[test]
    fn all_added_is_info() {
        let summary = UploadSummary {
            added: Some(2),
            skipped: Some(0),
        };
        let notice = summary.notice().unwrap();
        assert_eq!(notice, Notice::info("Uploaded 2 playbook(s)."));
    }

    #[test]
    fn skipped_files_are_reported() {
        let summary = UploadSummary {
            added: Some(1),
            skipped: Some(2),
        };
        let notice = summary.notice().unwrap();
        assert!(notice.message.contains("Skipped 2 file(s)"));
    }
}
