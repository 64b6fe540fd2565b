//! Application error type and its HTTP rendering.
//!
//! Every handler returns `Result<_, AppError>`. Errors are rendered as a single
//! JSON envelope:
//!
//! ```json
//! { "error": "Submission has no coordinates", "code": "validation_error", "details": {"id": 7} }
//! ```
//!
//! `details` is omitted when empty.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

/// Serialized error envelope.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "is_empty_details")]
    pub details: Value,
}

fn is_empty_details(details: &Value) -> bool {
    match details {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed or incomplete caller input.
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// Missing or invalid admin session, or a wrong password.
    #[error("{message}")]
    Unauthorized { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// The request conflicts with the current state (e.g. reviewing a row twice).
    #[error("{message}")]
    Conflict { message: String, details: Value },

    /// Webhook signature could not be verified.
    #[error("{message}")]
    Signature { message: String, details: Value },

    /// A required secret or URL is not configured.
    #[error("{message}")]
    Configuration { message: String, details: Value },

    /// Datastore or billing provider call failed.
    #[error("{message}")]
    Upstream { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }

    pub fn signature(message: impl Into<String>, details: Value) -> Self {
        Self::Signature {
            message: message.into(),
            details,
        }
    }

    pub fn configuration(message: impl Into<String>, details: Value) -> Self {
        Self::Configuration {
            message: message.into(),
            details,
        }
    }

    pub fn upstream(message: impl Into<String>, details: Value) -> Self {
        Self::Upstream {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// HTTP status and machine-readable code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation { .. } => (StatusCode::BAD_REQUEST, "validation_error"),
            AppError::Unauthorized { .. } => (StatusCode::UNAUTHORIZED, "unauthorized"),
            AppError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Conflict { .. } => (StatusCode::CONFLICT, "conflict"),
            AppError::Signature { .. } => (StatusCode::BAD_REQUEST, "signature_error"),
            AppError::Configuration { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "configuration_error")
            }
            AppError::Upstream { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "upstream_error"),
            AppError::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        if status.is_server_error() {
            tracing::error!(code, error = %self, "request failed");
        }

        let (message, details) = match self {
            AppError::Validation { message, details }
            | AppError::Unauthorized { message, details }
            | AppError::NotFound { message, details }
            | AppError::Conflict { message, details }
            | AppError::Signature { message, details }
            | AppError::Configuration { message, details }
            | AppError::Upstream { message, details }
            | AppError::Internal { message, details } => (message, details),
        };

        let body = ErrorBody {
            error: message,
            code,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error() {
            if db.is_unique_violation() {
                return AppError::conflict(
                    "Unique constraint violation",
                    json!({ "constraint": db.constraint() }),
                );
            }
            if db.is_foreign_key_violation() {
                return AppError::not_found(
                    "Referenced record does not exist",
                    json!({ "constraint": db.constraint() }),
                );
            }
        }

        AppError::upstream(format!("Database error: {e}"), json!({}))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::upstream(
            format!("Upstream request failed: {e}"),
            json!({ "status": e.status().map(|s| s.as_u16()) }),
        )
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let fields: serde_json::Map<String, Value> = e
            .field_errors()
            .into_iter()
            .map(|(field, errors)| {
                let messages: Vec<String> = errors
                    .iter()
                    .map(|err| {
                        err.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| err.code.to_string())
                    })
                    .collect();
                (field.to_string(), json!(messages))
            })
            .collect();

        AppError::bad_request("Validation failed", json!({ "fields": fields }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::bad_request("x", json!({})).status_and_code().0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::unauthorized("x", json!({})).status_and_code().0,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::signature("x", json!({})).status_and_code(),
            (StatusCode::BAD_REQUEST, "signature_error")
        );
        assert_eq!(
            AppError::configuration("x", json!({})).status_and_code(),
            (StatusCode::INTERNAL_SERVER_ERROR, "configuration_error")
        );
        assert_eq!(
            AppError::upstream("x", json!({})).status_and_code(),
            (StatusCode::INTERNAL_SERVER_ERROR, "upstream_error")
        );
    }

    #[test]
    fn test_error_body_omits_empty_details() {
        let body = ErrorBody {
            error: "Missing id".to_string(),
            code: "validation_error",
            details: json!({}),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value, json!({"error": "Missing id", "code": "validation_error"}));
    }

    #[test]
    fn test_error_body_keeps_details() {
        let body = ErrorBody {
            error: "Unknown plan".to_string(),
            code: "validation_error",
            details: json!({"plan": "gold"}),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["details"]["plan"], "gold");
    }

    #[test]
    fn test_display_is_message() {
        let err = AppError::conflict("Claim already reviewed", json!({"id": 3}));
        assert_eq!(err.to_string(), "Claim already reviewed");
    }
}
