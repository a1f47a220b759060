//! Upload Error Types
//!
//! This module provides upload error variants that integrate with the
//! unified `kernel::error::AppError` system.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Upload-specific result type alias
pub type UploadResult<T> = Result<T, UploadError>;

/// Upload-specific error variants
///
/// Everything here fails closed as a 400: a body that cannot be parsed
/// is rejected the same way as one that fails validation.
#[derive(Debug, Error)]
pub enum UploadError {
    /// One or more files failed validation
    #[error("File upload validation failed")]
    ValidationFailed { details: Vec<String> },

    /// The multipart body could not be read
    #[error("Malformed multipart request")]
    Multipart(#[from] axum::extract::multipart::MultipartError),
}

impl UploadError {
    pub fn validation(details: Vec<String>) -> Self {
        UploadError::ValidationFailed { details }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::BadRequest
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            UploadError::ValidationFailed { details } => {
                tracing::debug!(?details, "Upload validation failed");
            }
            UploadError::Multipart(e) => {
                tracing::warn!(error = %e, "Malformed multipart upload");
            }
        }
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        AppError::new(kind, message)
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status_code();

        let details = match self {
            UploadError::ValidationFailed { details } => details,
            UploadError::Multipart(e) => vec![e.to_string()],
        };

        let body = serde_json::json!({
            "error": "File upload validation failed",
            "details": details,
        });

        (status, Json(body)).into_response()
    }
}
