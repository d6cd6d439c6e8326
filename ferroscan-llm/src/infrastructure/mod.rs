//! Semantic analyzer infrastructure

pub mod context_store;
pub mod openai;
pub mod prompts;
pub mod response_parser;
