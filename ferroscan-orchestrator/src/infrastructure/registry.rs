//! Analyzer registry
//!
//! Holds the configured analyzer instances in registration order. Order
//! matters: it seeds merge precedence, so iteration must be stable —
//! register static (higher trust) before semantic.
//!
//! Per-analyzer settings are read-copy-update: an update validates, then
//! swaps the whole `Arc` so in-flight invocations keep the snapshot they
//! captured and never observe a half-updated config.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::info;

use ferroscan_core::domain::analyzer::Analyzer;

/// Runtime-adjustable per-analyzer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerSettings {
    /// Disabled analyzers are skipped at fan-out.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Per-analyzer deadline override; job deadline applies when unset.
    pub timeout_override_seconds: Option<u64>,
}

fn default_enabled() -> bool {
    true
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyzerSettings {
    pub fn new() -> Self {
        Self {
            enabled: true,
            timeout_override_seconds: None,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(0) = self.timeout_override_seconds {
            return Err(ConfigError::Invalid(
                "timeout_override_seconds must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Rejected analyzer configuration. Never affects in-flight jobs, which
/// keep the previous snapshot.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown analyzer: {0}")]
    UnknownAnalyzer(String),

    #[error("invalid analyzer settings: {0}")]
    Invalid(String),
}

/// Snapshot of one registry entry handed to the fan-out.
#[derive(Clone)]
pub struct AnalyzerHandle {
    pub name: String,
    pub analyzer: Arc<dyn Analyzer>,
    pub settings: Arc<AnalyzerSettings>,
}

struct RegisteredAnalyzer {
    name: String,
    analyzer: Arc<dyn Analyzer>,
    settings: RwLock<Arc<AnalyzerSettings>>,
}

/// Ordered registry of analyzers and their configuration snapshots.
#[derive(Default)]
pub struct AnalyzerRegistry {
    entries: Vec<RegisteredAnalyzer>,
}

impl AnalyzerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an analyzer with default settings. Registration order is
    /// preserved and defines merge precedence.
    pub fn register(&mut self, analyzer: Arc<dyn Analyzer>) {
        self.register_with_settings(analyzer, AnalyzerSettings::new());
    }

    pub fn register_with_settings(
        &mut self,
        analyzer: Arc<dyn Analyzer>,
        settings: AnalyzerSettings,
    ) {
        let name = analyzer.name().to_string();
        info!(analyzer = %name, position = self.entries.len(), "registered analyzer");
        self.entries.push(RegisteredAnalyzer {
            name,
            analyzer,
            settings: RwLock::new(Arc::new(settings)),
        });
    }

    /// Deterministic listing of registered analyzer names.
    pub fn analyzer_names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    /// Capture a point-in-time snapshot of every entry for one fan-out.
    /// Each handle holds the settings `Arc` current at capture; later
    /// updates do not tear through it.
    pub fn snapshot(&self) -> Vec<AnalyzerHandle> {
        self.entries
            .iter()
            .map(|entry| AnalyzerHandle {
                name: entry.name.clone(),
                analyzer: Arc::clone(&entry.analyzer),
                settings: entry
                    .settings
                    .read()
                    .map(|guard| Arc::clone(&guard))
                    .unwrap_or_else(|poisoned| Arc::clone(&poisoned.into_inner())),
            })
            .collect()
    }

    /// Atomically replace an analyzer's settings. Validation failures are
    /// rejected synchronously and the previous snapshot stays in effect.
    pub fn update_settings(
        &self,
        name: &str,
        settings: AnalyzerSettings,
    ) -> Result<(), ConfigError> {
        settings.validate()?;
        let entry = self
            .entries
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| ConfigError::UnknownAnalyzer(name.to_string()))?;

        let next = Arc::new(settings);
        match entry.settings.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
        info!(analyzer = %name, "analyzer settings updated");
        Ok(())
    }
}
