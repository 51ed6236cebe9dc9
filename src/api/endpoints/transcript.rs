//! Transcript file upload.

use axum::extract::{Multipart, State};
use axum::response::Redirect;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;

/// `POST /transcript`: load a text file into the session transcript.
///
/// The first file part wins. Bytes are decoded as UTF-8, replacing invalid
/// sequences rather than rejecting the file.
pub async fn upload(
    State(ctx): State<ApiContext>,
    mut multipart: Multipart,
) -> Result<Redirect, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid upload: {e}")))?
    {
        let filename = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => continue,
        };
        let bytes = field.bytes().await.map_err(|e| {
            tracing::warn!("Failed to read transcript bytes: {e}");
            ApiError::BadRequest("Failed to read file data.".into())
        })?;

        let text = String::from_utf8_lossy(&bytes).into_owned();
        tracing::info!(filename = %filename, bytes = bytes.len(), "Transcript file uploaded");
        ctx.session.set_transcript(text)?;
        return Ok(Redirect::to("/analyze"));
    }

    Err(ApiError::BadRequest("No transcript file in upload".into()))
}
