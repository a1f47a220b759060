//! Domain Layer

pub mod filename;
pub mod policy;
pub mod storage_path;
pub mod validate;
