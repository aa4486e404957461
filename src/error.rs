//! # Errors: Registry Failure Taxonomy
//!
//! Every registry operation, in-memory or PostgreSQL-backed, fails with one of
//! four conditions. The HTTP layer maps them onto status codes:
//!
//! | Variant | Meaning | Status |
//! |---------|---------|--------|
//! | `Validation` | input violates a field constraint | 422 |
//! | `NotFound` | no record carries the given id / number | 404 |
//! | `Conflict` | create with a project number already held | 409 |
//! | `Storage` | the backing database failed | 500 |
//! | `Malformed` | body or path could not be decoded | rejection's own (400, 415, 422) |
//!
//! Nothing is retried. Each operation is all-or-nothing, and an empty filter
//! result is a successful empty list rather than an error.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("invalid input: {}", summarize(.0))]
    Validation(Vec<FieldError>),

    #[error("Project not found.")]
    NotFound,

    #[error("project number {0} already exists")]
    Conflict(String),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// An extractor rejected the request before it reached the store.
    #[error("{message}")]
    Malformed { status: StatusCode, message: String },
}

impl From<JsonRejection> for RegistryError {
    fn from(rejection: JsonRejection) -> Self {
        RegistryError::Malformed {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for RegistryError {
    fn from(rejection: PathRejection) -> Self {
        RegistryError::Malformed {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for RegistryError {
    fn from(rejection: QueryRejection) -> Self {
        RegistryError::Malformed {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl RegistryError {
    /// Shorthand for a validation failure on one field.
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        RegistryError::Validation(vec![FieldError {
            field,
            message: message.into(),
        }])
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            RegistryError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            RegistryError::NotFound => StatusCode::NOT_FOUND,
            RegistryError::Conflict(_) => StatusCode::CONFLICT,
            RegistryError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RegistryError::Malformed { status, .. } => *status,
        }
    }

    /// Short label used for the `outcome` metric dimension.
    pub fn kind(&self) -> &'static str {
        match self {
            RegistryError::Validation(_) => "invalid",
            RegistryError::NotFound => "not_found",
            RegistryError::Conflict(_) => "conflict",
            RegistryError::Storage(_) => "storage_error",
            RegistryError::Malformed { .. } => "malformed",
        }
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl IntoResponse for RegistryError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            RegistryError::Validation(fields) => serde_json::json!({
                "error": self.to_string(),
                "fields": fields,
            }),
            RegistryError::Storage(e) => {
                error!(error = %e, "storage failure");
                serde_json::json!({"error": "internal storage error"})
            }
            _ => serde_json::json!({"error": self.to_string()}),
        };

        (status, Json(body)).into_response()
    }
}
