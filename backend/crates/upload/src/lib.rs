//! Upload Validation Pipeline
//!
//! Rejects unsafe or non-compliant file uploads before they reach the
//! object-storage collaborator.
//!
//! Clean Architecture structure:
//! - `domain/` - Policies, filename sanitization, validation checks,
//!   storage path generation
//! - `application/` - Batch validation use case and configuration
//! - `presentation/` - Multipart endpoint and router
//!
//! ## Validation Model
//! Checks run in a fixed order and short-circuit on the first failure:
//! size against the policy, declared MIME type, file extension, then
//! suspicious-name heuristics (dangerous extensions, hidden files,
//! double-extension smuggling), then per-media-category hard caps that
//! apply even when the policy's own limit is larger.

pub mod application;
pub mod domain;
pub mod error;
pub mod presentation;

// Re-exports for convenience
pub use application::config::UploadConfig;
pub use domain::policy::{UploadCategory, UploadPolicy};
pub use error::{UploadError, UploadResult};
pub use presentation::router::upload_router;
