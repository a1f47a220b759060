//! CSRF Token Manager
//!
//! Double-submit-cookie CSRF protection with server-side storage as the
//! source of truth.
//!
//! Clean Architecture structure:
//! - `domain/` - Token entity, session key derivation, repository trait
//! - `application/` - Issue/verify use cases and configuration
//! - `infra/` - Key-value and PostgreSQL repositories
//! - `presentation/` - Token endpoint, request guard, router
//!
//! ## Security Model
//! - Tokens are 32-character random strings bound to a session key
//! - The session key derives from the session cookie, then the bearer
//!   token, then an IP + User-Agent composite for anonymous callers
//! - Verification compares in constant time against the stored token
//! - Unsafe methods on non-exempt paths require the token in the
//!   `x-csrf-token` request header

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::CsrfConfig;
pub use error::{CsrfError, CsrfResult};
pub use infra::kv::KvTokenRepository;
pub use infra::postgres::PgTokenRepository;
pub use presentation::guard::csrf_guard;
pub use presentation::router::csrf_router;

#[cfg(test)]
mod tests;
