//! Throttle Error Types
//!
//! This module provides rate-limiting error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Throttle-specific result type alias
pub type ThrottleResult<T> = Result<T, ThrottleError>;

/// Throttle-specific error variants
///
/// A store failure rejects the request rather than waving it through:
/// losing the counter must not disable the limiter.
#[derive(Debug, Error)]
pub enum ThrottleError {
    /// The window budget is spent
    #[error("Rate limit exceeded, try again in {retry_after_secs} seconds")]
    LimitExceeded { retry_after_secs: i64 },

    /// Key-value store failure
    #[error("Store error: {0}")]
    Store(#[from] platform::store::StoreError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ThrottleError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ThrottleError::LimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            ThrottleError::Store(_) | ThrottleError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ThrottleError::LimitExceeded { .. } => ErrorKind::TooManyRequests,
            ThrottleError::Store(_) | ThrottleError::Database(_) => ErrorKind::InternalServerError,
        }
    }

    /// Short machine-readable error label for the response body
    pub fn label(&self) -> &'static str {
        match self {
            ThrottleError::LimitExceeded { .. } => "Too many requests",
            ThrottleError::Store(_) | ThrottleError::Database(_) => "Internal Server Error",
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            ThrottleError::Store(e) => {
                tracing::error!(error = %e, "Rate limit store error");
            }
            ThrottleError::Database(e) => {
                tracing::error!(error = %e, "Rate limit database error");
            }
            ThrottleError::LimitExceeded { retry_after_secs } => {
                tracing::debug!(retry_after_secs, "Request rejected by rate limit");
            }
        }
    }
}

impl From<ThrottleError> for AppError {
    fn from(err: ThrottleError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        AppError::new(kind, message)
    }
}

impl IntoResponse for ThrottleError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status_code();

        let retry_after_secs = match &self {
            ThrottleError::LimitExceeded { retry_after_secs } => Some(*retry_after_secs),
            _ => None,
        };

        // Backend failures keep details out of the body
        let message = if status.is_server_error() {
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };

        let body = match retry_after_secs {
            Some(secs) => serde_json::json!({
                "error": self.label(),
                "message": message,
                "retryAfter": secs,
            }),
            None => serde_json::json!({
                "error": self.label(),
                "message": message,
            }),
        };

        let mut response = (status, Json(body)).into_response();

        if let Some(secs) = retry_after_secs {
            if let Ok(value) = secs.to_string().parse() {
                response
                    .headers_mut()
                    .insert(axum::http::header::RETRY_AFTER, value);
            }
        }

        response
    }
}
