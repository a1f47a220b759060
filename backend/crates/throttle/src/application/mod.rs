//! Application Layer - Use Cases

pub mod check_rate_limit;
pub mod config;

pub use check_rate_limit::CheckRateLimitUseCase;
