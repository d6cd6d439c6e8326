//! Provider and context-store traits
//!
//! Both collaborators are opaque to the analyzer: the provider returns raw
//! model text, the context store returns relevant security documentation.
//! The analyzer owns only prompting and response parsing.

use async_trait::async_trait;

use super::error::LlmError;

/// A reasoning/inference backend consumed as a black box.
///
/// Object-safe; used as `Arc<dyn InferenceProvider>` so backends can be
/// swapped without touching the analyzer.
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    /// Provider identifier for logging and diagnostics.
    fn id(&self) -> &str;

    /// Run the vulnerability-analysis prompt and return the raw model
    /// output. The caller owns parsing.
    async fn generate_findings(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Similarity-search store over security documentation.
#[async_trait]
pub trait ContextStore: Send + Sync {
    /// Retrieve up to `k` documents relevant to the given code.
    async fn find_relevant_context(&self, code: &str, language: &str, k: usize) -> Vec<String>;

    /// Add documents to the knowledge base. `language` may be empty for
    /// language-agnostic material.
    async fn add_documents(&self, language: &str, documents: Vec<String>);
}
