//! Semantic analyzer use cases

pub mod semantic;
