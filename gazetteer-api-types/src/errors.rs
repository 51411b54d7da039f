//! Unified error taxonomy with stable codes and HTTP status mapping
//!
//! Every layer funnels its failures into [`ApiError`] before anything is
//! rendered to a client, so callers never see raw store errors or panics.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-field validation errors, `field -> [messages...]`.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// The error classes the API distinguishes.
///
/// Each kind maps to exactly one machine-readable code and one HTTP status,
/// so clients can branch on `code` without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Malformed arguments: unknown filter/sort field, bad operator or
    /// direction, unparseable values.
    BadRequest,
    /// Form validation rejected the payload; carries a field-error map.
    ValidationFailed,
    /// The store rejected a write (unique, foreign-key or other constraint).
    IntegrityFailure,
    /// No entity exists for the given id.
    NotFound,
    /// The permission hook rejected the request.
    NotAuthorized,
    /// No handler (or no validation schema) is registered for a named action.
    ActionDenied,
    /// A recoverable, info-carrying rejection: the client can proceed after
    /// supplying whatever the message asks for.
    FurtherActionRequired,
    /// Anything unexpected. Never rendered as a bare backtrace.
    Internal,
}

impl ErrorKind {
    /// Stable machine-readable code label.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "BAD_REQUEST",
            ErrorKind::ValidationFailed => "VALIDATION_FAILED",
            ErrorKind::IntegrityFailure => "INTEGRITY_FAILURE",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::NotAuthorized => "NOT_AUTHORIZED",
            ErrorKind::ActionDenied => "ACTION_DENIED",
            ErrorKind::FurtherActionRequired => "FURTHER_ACTION_REQUIRED",
            ErrorKind::Internal => "INTERNAL_ERROR",
        }
    }

    /// HTTP status code this kind renders with.
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::ValidationFailed => 422,
            ErrorKind::IntegrityFailure => 409,
            ErrorKind::NotFound => 404,
            ErrorKind::NotAuthorized => 403,
            ErrorKind::ActionDenied => 405,
            ErrorKind::FurtherActionRequired => 428,
            ErrorKind::Internal => 500,
        }
    }
}

/// Unified API error carried across layer boundaries.
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
#[error("{}: {message}", kind.code())]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
    /// Field-error map, present only for `ValidationFailed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
    /// Short error label, present only for `IntegrityFailure`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            fields: None,
            label: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    pub fn validation_failed(fields: FieldErrors) -> Self {
        Self {
            kind: ErrorKind::ValidationFailed,
            message: "The submitted data failed validation".to_string(),
            fields: Some(fields),
            label: None,
        }
    }

    /// Wrap a persistence failure, splitting its text into a short label
    /// (first line) and a human message (remainder).
    pub fn integrity_failure(raw: &str) -> Self {
        let mut lines = raw.lines();
        let first = lines.next().unwrap_or("").trim().to_string();
        let rest = lines.collect::<Vec<_>>().join(" ").trim().to_string();
        let (label, message) = if rest.is_empty() {
            (None, first)
        } else {
            (Some(first), rest)
        };
        Self {
            kind: ErrorKind::IntegrityFailure,
            message,
            fields: None,
            label,
        }
    }

    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        Self::new(
            ErrorKind::NotFound,
            format!("{} not found with id: {}", entity, id),
        )
    }

    pub fn not_authorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotAuthorized, message)
    }

    pub fn action_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ActionDenied, message)
    }

    pub fn further_action_required(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::FurtherActionRequired, message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn http_status(&self) -> u16 {
        self.kind.http_status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_carry_stable_codes_and_statuses() {
        assert_eq!(ErrorKind::ValidationFailed.code(), "VALIDATION_FAILED");
        assert_eq!(ErrorKind::ValidationFailed.http_status(), 422);
        assert_eq!(ErrorKind::ActionDenied.http_status(), 405);
        assert_eq!(ErrorKind::FurtherActionRequired.http_status(), 428);
    }

    #[test]
    fn integrity_failure_splits_label_and_message() {
        let err = ApiError::integrity_failure("UNIQUE_VIOLATION\ncountry with code 'NG' already exists");
        assert_eq!(err.label.as_deref(), Some("UNIQUE_VIOLATION"));
        assert_eq!(err.message, "country with code 'NG' already exists");

        let single = ApiError::integrity_failure("constraint failed");
        assert_eq!(single.label, None);
        assert_eq!(single.message, "constraint failed");
    }

    #[test]
    fn validation_failed_carries_field_map() {
        let mut fields = FieldErrors::new();
        fields.insert("name".to_string(), vec!["This field is required.".to_string()]);
        let err = ApiError::validation_failed(fields);
        assert_eq!(err.http_status(), 422);
        assert!(err.fields.unwrap().contains_key("name"));
    }
}
