//! LLM-specific error types

/// Inference provider failure.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// Authentication failed (invalid API key, expired token)
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Rate limited by the provider
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Network or connection error
    #[error("network error: {0}")]
    Network(String),

    /// Request timed out
    #[error("request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// Provider returned an unexpected response shape
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Provider-side error with an HTTP status
    #[error("provider error (status {status}): {message}")]
    Api { status: u16, message: String },
}
