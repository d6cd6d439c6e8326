//! Ferroscan LLM - semantic vulnerability analysis
//!
//! Implements the semantic half of hybrid analysis: project source is
//! combined with retrieved security context into a prompt, sent to a
//! reasoning model through the [`domain::provider::InferenceProvider`]
//! boundary, and the structured reply is parsed into unified findings.
//! A malformed reply degrades to a single low-confidence finding instead
//! of failing the analyzer.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::semantic::SemanticAnalyzer;
pub use domain::error::LlmError;
pub use domain::provider::{ContextStore, InferenceProvider};
pub use infrastructure::context_store::InMemoryContextStore;
pub use infrastructure::openai::OpenAiProvider;
pub use infrastructure::response_parser::ResponseParser;
