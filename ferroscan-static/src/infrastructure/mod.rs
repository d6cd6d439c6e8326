//! Static analyzer infrastructure

pub mod executor;
pub mod parser;
