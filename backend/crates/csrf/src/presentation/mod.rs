//! Presentation Layer

pub mod dto;
pub mod guard;
pub mod handlers;
pub mod router;
