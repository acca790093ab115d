//! Typed errors for the record store and the HTTP surface
//!
//! # Error Categories
//!
//! - [`StoreError`]: what an [`EdtoyStore`](crate::core::store::EdtoyStore)
//!   call can fail with. Each failure is exactly one kind.
//! - [`ApiError`]: what a handler answers with. Converting a `StoreError`
//!   keeps its kind; timeouts and backend failures both surface as
//!   internal errors.
//!
//! # Example
//!
//! ```rust,ignore
//! match store.update(edtoy).await {
//!     Ok(updated) => println!("now at version {}", updated.version),
//!     Err(StoreError::EditConflict) => { /* re-fetch, re-apply, re-submit */ }
//!     Err(e) => return Err(e.into()),
//! }
//! ```

use crate::core::validation::ValidationErrors;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Boxed backend failure, kept opaque so the store trait does not depend
/// on any one database driver.
pub type BackendError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by record store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Input was rejected before any backend call was made
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// No record with the requested id
    #[error("record not found")]
    RecordNotFound,

    /// The id/version pair no longer matches a stored row
    #[error("unable to update the record due to an edit conflict")]
    EditConflict,

    /// The call did not finish in time; backend state is unknown
    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    /// The backend reported a failure
    #[error("failed to {operation} edtoy: {source}")]
    Backend {
        operation: &'static str,
        #[source]
        source: BackendError,
    },
}

impl StoreError {
    pub fn backend(operation: &'static str, source: impl Into<BackendError>) -> Self {
        StoreError::Backend {
            operation,
            source: source.into(),
        }
    }

    /// Only an edit conflict invites a retry, and only by the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::EditConflict)
    }
}

impl From<ValidationErrors> for StoreError {
    fn from(errors: ValidationErrors) -> Self {
        StoreError::Validation(errors)
    }
}

/// A specialized Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Errors a handler can answer with
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed validation")]
    Validation(ValidationErrors),

    #[error("the requested resource could not be found")]
    NotFound,

    #[error("unable to update the record due to an edit conflict, please try again")]
    EditConflict,

    #[error("{0}")]
    BadRequest(String),

    #[error("the {method} method is not supported for this resource")]
    MethodNotAllowed { method: String },

    /// Server-side failure; the inner error is logged, never sent
    #[error("the server encountered a problem and could not process your request")]
    Internal(#[source] anyhow::Error),
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::EditConflict => StatusCode::CONFLICT,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_FAILED",
            ApiError::NotFound => "NOT_FOUND",
            ApiError::EditConflict => "EDIT_CONFLICT",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::MethodNotAllowed { .. } => "METHOD_NOT_ALLOWED",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ApiError::Validation(errors) => Some(serde_json::json!({ "fields": errors })),
            _ => None,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(errors) => ApiError::Validation(errors),
            StoreError::RecordNotFound => ApiError::NotFound,
            StoreError::EditConflict => ApiError::EditConflict,
            other @ (StoreError::Timeout { .. } | StoreError::Backend { .. }) => {
                ApiError::Internal(other.into())
            }
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if let ApiError::Internal(err) = &self {
            tracing::error!(error = format!("{:#}", err), "request failed");
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

/// A specialized Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;
