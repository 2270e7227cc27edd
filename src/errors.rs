use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::error::DbErr;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::repositories::StoreError;

fn current_request_id() -> Option<String> {
    crate::request_context::current_request_id().map(|rid| rid.as_str().to_string())
}

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "error": "Inventory not found.",
    "request_id": "5f0c8a5e-64f4-4c1a-9d6e-0c6c0f7f3b11"
}))]
pub struct ErrorResponse {
    /// Human-readable error description
    #[schema(example = "Inventory not found.")]
    pub error: String,
    /// Unique request identifier for support and debugging
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    /// Missing record, or a record hidden because it (or its location) is inactive
    #[error("{0}")]
    NotFound(String),

    /// Malformed, missing or out-of-range input, including dangling references
    #[error("{0}")]
    ValidationError(String),

    /// Uniqueness violation reported as 409
    #[error("{0}")]
    Conflict(String),

    /// Uniqueness violation on routes that report duplicates as 400
    #[error("{0}")]
    Duplicate(String),

    /// Mutation blocked by an inactive parent location
    #[error("{0}")]
    Forbidden(String),

    /// Mutation blocked by a business precondition such as remaining stock
    #[error("{0}")]
    InvalidState(String),

    /// Request exceeded the configured deadline
    #[error("{0}")]
    Timeout(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut fields: Vec<&str> = err.field_errors().keys().copied().collect();
        fields.sort_unstable();
        ServiceError::ValidationError(format!(
            "Missing or empty required fields: {}",
            fields.join(", ")
        ))
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation(constraint) => {
                ServiceError::Conflict(format!("Record violates unique constraint {}", constraint))
            }
            StoreError::Database(e) => ServiceError::DatabaseError(e),
        }
    }
}

impl From<JsonRejection> for ServiceError {
    fn from(rejection: JsonRejection) -> Self {
        ServiceError::ValidationError(rejection.body_text())
    }
}

impl From<QueryRejection> for ServiceError {
    fn from(rejection: QueryRejection) -> Self {
        ServiceError::ValidationError(rejection.body_text())
    }
}

impl From<PathRejection> for ServiceError {
    fn from(rejection: PathRejection) -> Self {
        ServiceError::ValidationError(rejection.body_text())
    }
}

impl ServiceError {
    /// Returns the HTTP status code for this error.
    /// This is the single source of truth for error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ValidationError(_) | Self::Duplicate(_) | Self::InvalidState(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
            Self::DatabaseError(_) | Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error message suitable for HTTP responses.
    /// Internal errors return generic messages to avoid leaking implementation details.
    pub fn response_message(&self) -> String {
        match self {
            Self::DatabaseError(_) | Self::InternalError(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed with internal error");
        }

        let body = ErrorResponse {
            error: self.response_message(),
            request_id: current_request_id(),
        };

        (status, Json(body)).into_response()
    }
}
