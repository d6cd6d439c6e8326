//! Static analyzer use cases

pub mod analyzer;
