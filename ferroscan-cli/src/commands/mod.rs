//! CLI subcommands

pub mod analyzers;
pub mod scan;

use std::sync::Arc;

use ferroscan_core::config::Config;
use ferroscan_core::infrastructure::source::FsSourceReader;
use ferroscan_llm::{InMemoryContextStore, OpenAiProvider, SemanticAnalyzer};
use ferroscan_orchestrator::AnalyzerRegistry;
use ferroscan_static::StaticAnalyzer;
use tracing::warn;

/// Build the analyzer registry from configuration. Static analysis is
/// registered first so its findings take precedence on duplicates; the
/// semantic analyzer is registered only when an API key is configured.
pub fn build_registry(config: &Config) -> AnalyzerRegistry {
    let mut registry = AnalyzerRegistry::new();

    registry.register(Arc::new(StaticAnalyzer::new(config.static_analysis.clone())));

    if config.llm.api_key.is_empty() {
        warn!("no LLM API key configured, semantic analysis disabled");
    } else {
        let provider = OpenAiProvider::with_timeout(
            config.llm.api_key.clone(),
            config.llm.model.clone(),
            config.llm.timeout_seconds,
        )
        .with_base_url(config.llm.base_url.clone())
        .with_temperature(config.llm.temperature)
        .with_max_tokens(config.llm.max_tokens);

        registry.register(Arc::new(SemanticAnalyzer::new(
            Arc::new(provider),
            Arc::new(InMemoryContextStore::new()),
            Arc::new(FsSourceReader::new()),
            config.llm.clone(),
        )));
    }

    registry
}
