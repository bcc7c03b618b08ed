//! Text-generation backends.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::{BackendConfig, Provider};
use crate::error::BackendError;
use crate::wire::{self, ChatCompletionRequest, ChatMessage, MessagesRequest};

/// One prompt in, one completion out.
///
/// Implementations make a single attempt and return the whole completion,
/// trimmed. Retries, timeouts and rate limiting belong to the caller.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Model identifier, for logs.
    fn model(&self) -> &str;

    async fn invoke(&self, prompt: &str) -> Result<String, BackendError>;
}

/// HTTP backend for OpenAI, Groq and Anthropic.
pub struct HttpBackend {
    client: reqwest::Client,
    config: BackendConfig,
}

impl HttpBackend {
    pub fn new(config: BackendConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn request(&self, prompt: &str) -> reqwest::RequestBuilder {
        let cfg = &self.config;
        let messages = vec![ChatMessage::user(prompt)];
        match cfg.provider {
            Provider::OpenAi | Provider::Groq => self
                .client
                .post(&cfg.api_url)
                .bearer_auth(&cfg.api_key)
                .json(&ChatCompletionRequest {
                    model: &cfg.model,
                    messages,
                    temperature: cfg.temperature,
                }),
            Provider::Anthropic => self
                .client
                .post(&cfg.api_url)
                .header("x-api-key", &cfg.api_key)
                .header("anthropic-version", wire::ANTHROPIC_VERSION)
                .json(&MessagesRequest {
                    model: &cfg.model,
                    max_tokens: cfg.max_tokens,
                    messages,
                    temperature: cfg.temperature,
                }),
        }
    }
}

#[async_trait]
impl Backend for HttpBackend {
    fn model(&self) -> &str {
        &self.config.model
    }

    async fn invoke(&self, prompt: &str) -> Result<String, BackendError> {
        info!(
            provider = %self.config.provider,
            model = %self.config.model,
            prompt_chars = prompt.len(),
            "calling text-generation backend"
        );
        let resp = self.request(prompt).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(BackendError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let completion = match self.config.provider {
            Provider::OpenAi | Provider::Groq => wire::parse_chat_completion(&body)?,
            Provider::Anthropic => wire::parse_messages(&body)?,
        };
        debug!(chars = completion.len(), "backend completion received");
        Ok(completion.trim().to_string())
    }
}
