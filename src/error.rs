//! Custom error types and handling
//!
//! This module defines the execution-layer error taxonomy and the
//! HTTP-facing application error with its conversion to Axum responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Language name with no entry in the registry.
///
/// Raised before any network call; the only execution error that reaches
/// callers of the evaluators.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported language: {0}")]
pub struct UnsupportedLanguageError(pub String);

/// Failures talking to the execution service
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecutionError {
    /// Submission rejected or the service was unreachable
    #[error("Dispatch failed (status {status:?}): {body}")]
    Dispatch { status: Option<u16>, body: String },

    /// A result query was rejected or the service was unreachable
    #[error("Result fetch failed (status {status:?}): {body}")]
    Fetch { status: Option<u16>, body: String },

    /// The service answered with a body we could not interpret
    #[error("Malformed response from execution service: {0}")]
    MalformedResponse(String),

    /// Retry budget exhausted without a terminal status
    #[error("No terminal status for token {token} after {attempts} attempts")]
    PollTimeout {
        token: String,
        attempts: u32,
        last_error: Option<String>,
    },
}

/// Transport-encoded field that could not be turned into text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Cannot decode field `{field}`: {reason}")]
pub struct DecodeError {
    pub field: &'static str,
    pub reason: String,
}

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    UnsupportedLanguage(#[from] UnsupportedLanguageError),

    // Collaborator errors
    #[error("Persistence error: {0}")]
    Persistence(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

/// Error details in response
#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AppError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::UnsupportedLanguage(_) => "UNSUPPORTED_LANGUAGE",
            Self::Persistence(_) => "PERSISTENCE_ERROR",
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::UnsupportedLanguage(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Extra payload for the error body, if any
    fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::UnsupportedLanguage(err) => Some(serde_json::json!({
                "language": err.0,
                "supported": crate::execution::registry::supported_names(),
            })),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Log persistence errors but don't expose details to clients
        let message = match &self {
            AppError::Persistence(e) => {
                tracing::error!("Persistence error: {}", e);
                "Failed to record the verdict".to_string()
            }
            _ => self.to_string(),
        };

        let body = ErrorResponse {
            error: ErrorDetails {
                code: self.error_code().to_string(),
                message,
                details: self.details(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let err = AppError::from(UnsupportedLanguageError("Cobol".to_string()));
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.error_code(), "UNSUPPORTED_LANGUAGE");
        assert_eq!(err.to_string(), "Unsupported language: Cobol");

        let err = AppError::Validation("bad".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unsupported_language_details_list_registry() {
        let err = AppError::from(UnsupportedLanguageError("Cobol".to_string()));
        let details = err.details().unwrap();
        assert_eq!(details["language"], "Cobol");
        assert!(details["supported"]
            .as_array()
            .unwrap()
            .iter()
            .any(|name| name == "Python"));
    }

    #[test]
    fn test_dispatch_error_message_carries_upstream_payload() {
        let err = ExecutionError::Dispatch {
            status: Some(422),
            body: "language is not supported".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("422"));
        assert!(message.contains("language is not supported"));
    }
}
