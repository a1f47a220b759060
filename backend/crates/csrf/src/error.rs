//! CSRF Error Types
//!
//! This module provides CSRF-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// CSRF-specific result type alias
pub type CsrfResult<T> = Result<T, CsrfError>;

/// CSRF-specific error variants
///
/// The two client-facing variants stay distinct so the browser knows
/// whether to fetch a token first or to refresh a stale one.
#[derive(Debug, Error)]
pub enum CsrfError {
    /// No token was supplied in the request header
    #[error("CSRF token is required for this request")]
    TokenMissing,

    /// Token did not match the stored one, or the stored one expired
    #[error("Invalid or expired CSRF token")]
    TokenInvalid,

    /// Key-value store failure
    #[error("Store error: {0}")]
    Store(#[from] platform::store::StoreError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CsrfError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            CsrfError::TokenMissing | CsrfError::TokenInvalid => StatusCode::FORBIDDEN,
            CsrfError::Store(_) | CsrfError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            CsrfError::TokenMissing | CsrfError::TokenInvalid => ErrorKind::Forbidden,
            CsrfError::Store(_) | CsrfError::Database(_) => ErrorKind::InternalServerError,
        }
    }

    /// Short machine-readable error label for the response body
    pub fn label(&self) -> &'static str {
        match self {
            CsrfError::TokenMissing => "CSRF token missing",
            CsrfError::TokenInvalid => "CSRF token invalid",
            CsrfError::Store(_) | CsrfError::Database(_) => "Internal Server Error",
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            CsrfError::Store(e) => {
                tracing::error!(error = %e, "CSRF store error");
            }
            CsrfError::Database(e) => {
                tracing::error!(error = %e, "CSRF database error");
            }
            CsrfError::TokenMissing => {
                tracing::debug!("CSRF token missing from request");
            }
            CsrfError::TokenInvalid => {
                tracing::warn!("CSRF token rejected");
            }
        }
    }
}

impl From<CsrfError> for AppError {
    fn from(err: CsrfError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        AppError::new(kind, message)
    }
}

impl IntoResponse for CsrfError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status_code();

        // Backend failures keep details out of the body
        let message = if status.is_server_error() {
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };

        let body = serde_json::json!({
            "error": self.label(),
            "message": message,
        });

        (status, Json(body)).into_response()
    }
}
