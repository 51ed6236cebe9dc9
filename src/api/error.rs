//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::pipeline::analysis::AnalysisError;
use crate::session::SessionError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("An analysis is already running")]
    AnalysisInProgress,
    #[error("Gemini returned status {status}: {message}")]
    UpstreamStatus { status: u16, message: String },
    #[error("Malformed Gemini response: {0}")]
    MalformedResponse(String),
    #[error("Gemini is unreachable: {0}")]
    UpstreamUnreachable(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::AnalysisInProgress => StatusCode::CONFLICT,
            ApiError::UpstreamStatus { .. } | ApiError::MalformedResponse(_) => {
                StatusCode::BAD_GATEWAY
            }
            ApiError::UpstreamUnreachable(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::AnalysisInProgress => "ANALYSIS_IN_PROGRESS",
            ApiError::UpstreamStatus { .. } => "UPSTREAM_STATUS",
            ApiError::MalformedResponse(_) => "MALFORMED_RESPONSE",
            ApiError::UpstreamUnreachable(_) => "UPSTREAM_UNREACHABLE",
            ApiError::Internal(_) => "INTERNAL",
        }
    }

    /// Message safe to show to the user. Internal details are logged instead.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                "An internal error occurred".to_string()
            }
            ApiError::MalformedResponse(_) => {
                "The AI response could not be processed. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code(),
                message: self.public_message(),
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::Validation(msg) => ApiError::Validation(msg),
            AnalysisError::Transport { status, body } => ApiError::UpstreamStatus {
                status,
                message: body,
            },
            AnalysisError::UpstreamUnreachable(msg) => ApiError::UpstreamUnreachable(msg),
            AnalysisError::MalformedResponse(msg) => {
                tracing::warn!(detail = %msg, "Malformed analysis response");
                ApiError::MalformedResponse(msg)
            }
            AnalysisError::HttpClient(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::LockPoisoned => ApiError::Internal("lock poisoned".into()),
            SessionError::AnalysisInProgress => ApiError::AnalysisInProgress,
            SessionError::PlaybookNotFound(id) => {
                ApiError::NotFound(format!("Playbook {id} not found"))
            }
        }
    }
}
