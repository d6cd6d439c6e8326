//! Configuration management
//!
//! Layered configuration: `config/default.toml` (optional), an environment
//! specific file, then `FERROSCAN__` prefixed environment variables with
//! `__` as the section separator.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub llm: LlmConfig,
    pub static_analysis: StaticAnalysisConfig,
    pub orchestrator: OrchestratorConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

/// Semantic analyzer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible chat completions API
    pub base_url: String,
    /// API key; the semantic analyzer is skipped when empty
    pub api_key: String,
    /// Model identifier
    pub model: String,
    /// Sampling temperature (0.0 to 1.0)
    pub temperature: f64,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Number of knowledge-base documents retrieved as prompt context
    pub context_documents: usize,
    /// Cap on project source bytes fed into one prompt
    pub max_source_bytes: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.1,
            max_tokens: 2048,
            timeout_seconds: 120,
            context_documents: 3,
            max_source_bytes: 64 * 1024,
        }
    }
}

/// One external static-analysis tool invocation.
///
/// `{project_path}` in any argument is substituted with the path of the
/// project under analysis at dispatch time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    pub name: String,
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default = "default_tool_timeout")]
    pub timeout_seconds: u64,
}

fn default_tool_timeout() -> u64 {
    300
}

/// Static analyzer configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticAnalysisConfig {
    pub tools: Vec<ToolConfig>,
}

/// Orchestrator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Overall deadline for one job's analyzer fan-out, in seconds.
    /// Analyzers still running at the deadline are cancelled and treated
    /// as failed.
    pub job_timeout_seconds: u64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            job_timeout_seconds: 600,
        }
    }
}

impl OrchestratorConfig {
    pub fn job_timeout(&self) -> Duration {
        Duration::from_secs(self.job_timeout_seconds)
    }
}

/// Configuration loading or validation failure.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl Config {
    /// Load configuration from files and environment.
    pub fn load() -> Result<Self, ConfigLoadError> {
        let environment = std::env::var("FERROSCAN_ENV").unwrap_or_else(|_| "dev".to_string());

        let settings = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(
                config::File::with_name(&format!("config/{}", environment)).required(false),
            )
            .add_source(config::Environment::with_prefix("FERROSCAN").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate constraints the type system cannot express.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if !(0.0..=1.0).contains(&self.llm.temperature) {
            return Err(ConfigLoadError::Invalid(format!(
                "llm.temperature must be within [0.0, 1.0], got {}",
                self.llm.temperature
            )));
        }
        if self.llm.timeout_seconds == 0 {
            return Err(ConfigLoadError::Invalid(
                "llm.timeout_seconds must be greater than zero".to_string(),
            ));
        }
        if self.orchestrator.job_timeout_seconds == 0 {
            return Err(ConfigLoadError::Invalid(
                "orchestrator.job_timeout_seconds must be greater than zero".to_string(),
            ));
        }
        for tool in &self.static_analysis.tools {
            if tool.name.trim().is_empty() || tool.command.trim().is_empty() {
                return Err(ConfigLoadError::Invalid(
                    "static_analysis.tools entries need a name and a command".to_string(),
                ));
            }
            if tool.timeout_seconds == 0 {
                return Err(ConfigLoadError::Invalid(format!(
                    "tool '{}' timeout_seconds must be greater than zero",
                    tool.name
                )));
            }
        }
        Ok(())
    }
}
