use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::api_client::ApiError;
use crate::drawer::DrawerError;
use crate::forms::FieldErrors;
use crate::navigation::NavError;

/// Every failure a desk handler can report. Rendered with the same
/// `{ data, success, message }` envelope as successes, plus an `error` member.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed on {} field(s)", .0.len())]
    Validation(FieldErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid navigation: {0}")]
    InvalidTransition(String),

    /// The upstream refused the session token. The dashboard reloads the
    /// top-level browsing context to re-authenticate.
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ApiError> for AppError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Unauthorized => AppError::Unauthorized,
            ApiError::Rejected(message) => AppError::Upstream(message),
            other => AppError::Upstream(other.to_string()),
        }
    }
}

impl From<NavError> for AppError {
    fn from(e: NavError) -> Self {
        AppError::InvalidTransition(e.to_string())
    }
}

impl From<DrawerError> for AppError {
    fn from(e: DrawerError) -> Self {
        AppError::NotFound(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut detail = serde_json::Map::new();
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(fields) => {
                detail.insert("fields".into(), json!(fields));
                (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    "Please correct the highlighted fields".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InvalidTransition(msg) => {
                (StatusCode::CONFLICT, "INVALID_TRANSITION", msg.clone())
            }
            AppError::Unauthorized => {
                detail.insert("reload".into(), Value::Bool(true));
                (
                    StatusCode::UNAUTHORIZED,
                    "UNAUTHORIZED",
                    "Authentication required".to_string(),
                )
            }
            AppError::Upstream(msg) => {
                tracing::warn!("Upstream error: {msg}");
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", msg.clone())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        detail.insert("code".into(), json!(code));
        let body = Json(json!({
            "data": null,
            "success": false,
            "message": message,
            "error": detail,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_mapping() {
        assert!(matches!(
            AppError::from(ApiError::Unauthorized),
            AppError::Unauthorized
        ));
        assert!(matches!(
            AppError::from(ApiError::Rejected("nope".into())),
            AppError::Upstream(m) if m == "nope"
        ));
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::Validation(FieldErrors::new()), StatusCode::BAD_REQUEST),
            (AppError::InvalidTransition("x".into()), StatusCode::CONFLICT),
            (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
            (AppError::Upstream("x".into()), StatusCode::BAD_GATEWAY),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }
}
