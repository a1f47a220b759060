//! Infrastructure Layer

pub mod kv;
pub mod postgres;
