//! Fixed-Window Rate Limiter
//!
//! Per-key request throttling over fixed time windows.
//!
//! Clean Architecture structure:
//! - `domain/` - Window counter entity, rate key derivation, store trait
//! - `application/` - Named policies, the check use case, decisions
//! - `infra/` - In-memory and PostgreSQL counter stores
//! - `presentation/` - Request guard emitting `X-RateLimit-*` headers
//!
//! ## Semantics
//! - The first request for a key opens a window; requests within the
//!   window increment one counter
//! - The counter resets when the window deadline passes, never sliding
//! - Checking and consuming are one atomic operation per store
//! - Rejected requests get `429` with `Retry-After`

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::{RateDecision, RatePolicy};
pub use error::{ThrottleError, ThrottleResult};
pub use infra::memory::MemoryRateLimitStore;
pub use infra::postgres::PgRateLimitStore;
pub use presentation::guard::rate_limit_guard;

#[cfg(test)]
mod tests;
