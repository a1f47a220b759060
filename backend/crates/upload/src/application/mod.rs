//! Application Layer - Use Cases

pub mod config;
pub mod validate_batch;

pub use validate_batch::ValidateBatchUseCase;
