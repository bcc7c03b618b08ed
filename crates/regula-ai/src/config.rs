//! Backend configuration: provider, model, credentials and sampling.
//!
//! Built once at startup and handed to [`HttpBackend`](crate::HttpBackend).

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// OpenAI chat completions.
    OpenAi,
    /// Groq's OpenAI-compatible chat completions.
    Groq,
    /// Anthropic messages API.
    Anthropic,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Groq => "groq",
            Self::Anthropic => "anthropic",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-3.5-turbo",
            Self::Groq => "llama3-8b-8192",
            Self::Anthropic => "claude-3-5-haiku-latest",
        }
    }

    pub fn default_api_url(&self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com/v1/chat/completions",
            Self::Groq => "https://api.groq.com/openai/v1/chat/completions",
            Self::Anthropic => "https://api.anthropic.com/v1/messages",
        }
    }

    /// Environment variable conventionally holding this provider's key.
    pub fn api_key_var(&self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Groq => "GROQ_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "groq" => Ok(Self::Groq),
            "anthropic" => Ok(Self::Anthropic),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }
}

/// Everything needed to talk to one text-generation backend.
#[derive(Clone)]
pub struct BackendConfig {
    pub provider: Provider,
    pub model: String,
    pub api_url: String,
    pub api_key: String,
    /// 0.0 is greedy; higher values explore.
    pub temperature: f32,
    /// Completion cap. Only sent where the provider requires it (Anthropic).
    pub max_tokens: u32,
}

impl BackendConfig {
    pub const DEFAULT_MAX_TOKENS: u32 = 1024;

    /// Validate and assemble a config, filling provider defaults for
    /// `model` and `api_url`. A missing or blank key is an error.
    pub fn new(
        provider: Provider,
        api_key: Option<String>,
        model: Option<String>,
        api_url: Option<String>,
        temperature: f32,
    ) -> Result<Self, ConfigError> {
        let api_key = api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey {
                provider,
                var: provider.api_key_var(),
            })?;

        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::InvalidTemperature(temperature));
        }

        Ok(Self {
            provider,
            model: model.unwrap_or_else(|| provider.default_model().to_string()),
            api_url: api_url
                .unwrap_or_else(|| provider.default_api_url().to_string())
                .trim_end_matches('/')
                .to_string(),
            api_key,
            temperature,
            max_tokens: Self::DEFAULT_MAX_TOKENS,
        })
    }
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}
