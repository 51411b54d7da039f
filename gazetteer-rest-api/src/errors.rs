//! REST API error funnel
//!
//! Every failure a handler can hit converges here: decoding errors from the
//! web layer, query-translation errors, permission rejections and store
//! errors. Validation and authorization failures short-circuit before any
//! mutation; persistence failures are caught at the single entity-service
//! call site per operation and rewrapped, so callers never see raw store
//! errors.

use axum::response::{IntoResponse, Response};
use gazetteer_api_types::errors::{ApiError, ErrorKind, FieldErrors};
use gazetteer_interfaces::{PermissionDenied, QueryError, StoreError};
use gazetteer_web::errors::render_api_error;
use gazetteer_web::WebError;
use thiserror::Error;

/// REST API specific error type
#[derive(Debug, Error)]
pub enum RestError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation failed")]
    Validation { fields: FieldErrors },

    /// Persistence rejected the write. Carries the raw failure text whose
    /// first line is the label and whose remainder is the message.
    #[error("Integrity failure: {raw}")]
    Integrity { raw: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    #[error("Action denied: {0}")]
    ActionDenied(String),

    #[error("Further action required: {0}")]
    FurtherAction(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

impl RestError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        RestError::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        RestError::NotFound(message.into())
    }

    /// The rejection used when a named action has no registered handler or
    /// no validation schema.
    pub fn action_denied() -> Self {
        RestError::ActionDenied(
            "The requested resource is not yet authorized for access".to_string(),
        )
    }

    /// Convert to the unified API error.
    pub fn to_api_error(&self) -> ApiError {
        match self {
            RestError::BadRequest(message) => ApiError::bad_request(message.clone()),
            RestError::Validation { fields } => ApiError::validation_failed(fields.clone()),
            RestError::Integrity { raw } => ApiError::integrity_failure(raw),
            RestError::NotFound(message) => ApiError::new(ErrorKind::NotFound, message.clone()),
            RestError::NotAuthorized(message) => ApiError::not_authorized(message.clone()),
            RestError::ActionDenied(message) => ApiError::action_denied(message.clone()),
            RestError::FurtherAction(message) => ApiError::further_action_required(message.clone()),
            RestError::Internal(message) => ApiError::internal_error(message.clone()),
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        render_api_error(self.to_api_error())
    }
}

impl From<StoreError> for RestError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => RestError::NotFound(err.to_string()),
            StoreError::Constraint { message } => RestError::Integrity { raw: message },
            StoreError::Internal { message } => RestError::Internal(message),
        }
    }
}

impl From<QueryError> for RestError {
    fn from(err: QueryError) -> Self {
        RestError::BadRequest(err.to_string())
    }
}

impl From<WebError> for RestError {
    fn from(err: WebError) -> Self {
        match err {
            WebError::BadRequest { message } => RestError::BadRequest(message),
            WebError::NotFound { message } => RestError::NotFound(message),
            WebError::Internal { message } => RestError::Internal(message),
        }
    }
}

impl From<PermissionDenied> for RestError {
    fn from(err: PermissionDenied) -> Self {
        RestError::NotAuthorized(err.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_onto_the_taxonomy() {
        let not_found: RestError = StoreError::not_found("country", 7).into();
        assert_eq!(not_found.to_api_error().http_status(), 404);

        let integrity: RestError =
            StoreError::constraint("UNIQUE_VIOLATION", "country with code 'NG' already exists")
                .into();
        let api = integrity.to_api_error();
        assert_eq!(api.http_status(), 409);
        assert_eq!(api.label.as_deref(), Some("UNIQUE_VIOLATION"));
        assert_eq!(api.message, "country with code 'NG' already exists");
    }

    #[test]
    fn query_errors_are_client_errors() {
        let err: RestError = QueryError::UnknownFilterField {
            field: "altitude".to_string(),
        }
        .into();
        assert_eq!(err.to_api_error().http_status(), 400);
    }
}
