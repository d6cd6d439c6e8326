//! Core domain types

pub mod analyzer;
pub mod finding;
