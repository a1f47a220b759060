//! Presentation Layer

pub mod guard;
