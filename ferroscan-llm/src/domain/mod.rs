//! Semantic analyzer domain

pub mod error;
pub mod provider;
