//! Web-specific error types and conversions
//!
//! The extractors and middleware raise [`WebError`]; everything renders
//! through the unified [`ApiError`] body so clients always see
//! `{"error": {code, message, status, ...}}`, never a bare backtrace.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gazetteer_api_types::errors::ApiError;
use serde_json::json;
use thiserror::Error;

/// Web-layer error type for request decoding failures.
#[derive(Debug, Error)]
pub enum WebError {
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

/// Result type for web operations
pub type WebResult<T> = Result<T, WebError>;

impl WebError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        WebError::BadRequest {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        WebError::NotFound {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        WebError::Internal {
            message: message.into(),
        }
    }

    /// Convert to the unified API error.
    pub fn to_api_error(&self) -> ApiError {
        match self {
            WebError::BadRequest { message } => ApiError::bad_request(message.clone()),
            WebError::NotFound { message } => {
                ApiError::new(gazetteer_api_types::errors::ErrorKind::NotFound, message.clone())
            }
            WebError::Internal { message } => ApiError::internal_error(message.clone()),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        render_api_error(self.to_api_error())
    }
}

/// Render an [`ApiError`] as the canonical JSON error body.
///
/// Validation failures attach their field-error map and integrity failures
/// their short label alongside the code/message/status triple.
pub fn render_api_error(error: ApiError) -> Response {
    let status =
        StatusCode::from_u16(error.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let mut body = json!({
        "code": error.code(),
        "message": error.message,
        "status": status.as_u16(),
    });
    if let Some(fields) = error.fields {
        body["fields"] = json!(fields);
    }
    if let Some(label) = error.label {
        body["label"] = json!(label);
    }

    (status, Json(json!({ "error": body }))).into_response()
}
