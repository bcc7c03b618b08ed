use std::time::Duration;

use thiserror::Error;

use crate::config::Provider;

/// Startup-time configuration problems. Fatal: no request is attempted.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no API key for {provider}: set {var} or pass --api-key")]
    MissingApiKey {
        provider: Provider,
        var: &'static str,
    },

    #[error("unknown provider '{0}' (expected openai, groq or anthropic)")]
    UnknownProvider(String),

    #[error("temperature {0} out of range 0.0..=2.0")]
    InvalidTemperature(f32),
}

/// A failed backend call. Returned to the caller as-is; never retried here.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned {status}: {body}")]
    Server { status: u16, body: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("backend response contained no completion")]
    NoCompletion,

    #[error("backend call timed out after {0:?}")]
    Timeout(Duration),
}
