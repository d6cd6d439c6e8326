//! In-memory security knowledge base
//!
//! Keyword-overlap retrieval over stored documents. Deliberately simple: it
//! satisfies the [`ContextStore`] contract without an embedding service, and
//! deployments with a vector database plug in behind the same trait.

use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::provider::ContextStore;

struct ContextDocument {
    language: String,
    text: String,
}

/// Token-overlap scored document store.
#[derive(Default)]
pub struct InMemoryContextStore {
    documents: RwLock<Vec<ContextDocument>>,
}

impl InMemoryContextStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tokenize(text: &str) -> HashSet<String> {
        text.split(|c: char| !c.is_ascii_alphanumeric() && c != '_')
            .filter(|token| token.len() > 2)
            .map(|token| token.to_ascii_lowercase())
            .collect()
    }
}

#[async_trait]
impl ContextStore for InMemoryContextStore {
    async fn find_relevant_context(&self, code: &str, language: &str, k: usize) -> Vec<String> {
        let code_tokens = Self::tokenize(code);
        let documents = self.documents.read().await;

        let mut scored: Vec<(usize, &ContextDocument)> = documents
            .iter()
            .filter(|doc| doc.language.is_empty() || doc.language.eq_ignore_ascii_case(language))
            .map(|doc| {
                let overlap = Self::tokenize(&doc.text)
                    .intersection(&code_tokens)
                    .count();
                (overlap, doc)
            })
            .filter(|(score, _)| *score > 0)
            .collect();

        scored.sort_by(|a, b| b.0.cmp(&a.0));
        let selected: Vec<String> = scored
            .into_iter()
            .take(k)
            .map(|(_, doc)| doc.text.clone())
            .collect();

        debug!(
            candidates = documents.len(),
            selected = selected.len(),
            language,
            "retrieved context documents"
        );
        selected
    }

    async fn add_documents(&self, language: &str, new_documents: Vec<String>) {
        let mut documents = self.documents.write().await;
        for text in new_documents {
            documents.push(ContextDocument {
                language: language.to_string(),
                text,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn retrieves_overlapping_documents_first() {
        let store = InMemoryContextStore::new();
        store
            .add_documents(
                "c",
                vec![
                    "strcpy copies without bounds checking and causes buffer overflows".to_string(),
                    "printf format strings can leak memory".to_string(),
                ],
            )
            .await;

        let context = store
            .find_relevant_context("strcpy(dst, src); // buffer handling", "c", 1)
            .await;
        assert_eq!(context.len(), 1);
        assert!(context[0].contains("strcpy"));
    }

    #[tokio::test]
    async fn filters_by_language() {
        let store = InMemoryContextStore::new();
        store
            .add_documents("java", vec!["deserialization gadget chains".to_string()])
            .await;

        let context = store
            .find_relevant_context("deserialization of user input", "python", 3)
            .await;
        assert!(context.is_empty());
    }

    #[tokio::test]
    async fn language_agnostic_documents_match_any_language() {
        let store = InMemoryContextStore::new();
        store
            .add_documents("", vec!["never concatenate user input into sql queries".to_string()])
            .await;

        let context = store
            .find_relevant_context("query = \"select * from user where\" + input", "python", 3)
            .await;
        assert_eq!(context.len(), 1);
    }
}
