//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (random tokens, constant-time comparison)
//! - Cookie management
//! - Client identification (IP / User-Agent extraction)
//! - Key-value store abstraction with an in-memory implementation
//! - Guard chain for request gating middleware
//! - Baseline security response headers

pub mod client;
pub mod cookie;
pub mod crypto;
pub mod guard;
pub mod headers;
pub mod store;
pub mod sweep;
