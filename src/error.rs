//! # error
//!
//! Centralised application error type.
//!
//! Every handler returns `Result<_, AppError>`. Axum's `IntoResponse` impl
//! converts these into structured JSON error bodies so callers always get a
//! machine-readable response even on failure.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::pipeline::PipelineError;
use crate::routes::view::ReportView;
use crate::schema::ValidationReport;

#[derive(Debug, Error)]
pub enum AppError {
    /// The body could not be read as a strategy document at all.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing or wrong `X-API-Key`.
    #[error("Unauthorized: invalid or missing X-API-Key header")]
    Unauthorized,

    /// The strategy parsed but failed validation (or could not be repaired).
    #[error("{message}")]
    Rejected {
        message: String,
        report:  ValidationReport,
    },

    /// Catch-all for unexpected failures.
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::InvalidJson(_) => AppError::BadRequest(err.to_string()),
            PipelineError::Rejected(ref report) | PipelineError::Unfixable(ref report) => {
                AppError::Rejected {
                    message: err.to_string(),
                    report:  report.clone(),
                }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "ok": false, "error": msg }),
            ),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                json!({
                    "ok":    false,
                    "error": self.to_string(),
                    "hint":  "Set X-API-Key header with your API key",
                }),
            ),
            AppError::Rejected { message, report } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "ok":     false,
                    "error":  message,
                    "report": ReportView::new(report),
                }),
            ),
            AppError::Internal(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "ok": false, "error": format!("Internal error: {err}") }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::validate_then_sanitize_if_valid;

    #[test]
    fn test_pipeline_errors_map_to_status() {
        let bad_json: AppError = validate_then_sanitize_if_valid("nope").unwrap_err().into();
        assert_eq!(bad_json.into_response().status(), StatusCode::BAD_REQUEST);

        let rejected: AppError = validate_then_sanitize_if_valid(r#"{"name": ""}"#)
            .unwrap_err()
            .into();
        assert!(rejected.to_string().starts_with("Invalid strategy: "));
        assert_eq!(rejected.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);

        assert_eq!(AppError::Unauthorized.into_response().status(), StatusCode::UNAUTHORIZED);
    }
}
