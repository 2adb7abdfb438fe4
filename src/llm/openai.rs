//! OpenAI-compatible chat completions client
//!
//! Sends `POST {endpoint}/chat/completions` with bearer authentication and
//! maps HTTP failures onto the crate's error taxonomy.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::core::{Config, DuologueError, Message, Result};
use crate::llm::traits::{CompletionProvider, GenerateOptions, LLMResponse, TokenUsage};

const PROVIDER: &str = "openai";

/// Chat completions API client
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    completions_url: Url,
    model: String,
    api_key: SecretString,
}

/// Chat completions request body
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// Chat completions response body
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: Option<u32>,
}

impl OpenAiClient {
    /// Create a client from configuration.
    ///
    /// Fails with `MissingCredential` when no API key is configured, so no
    /// request can ever be made without one.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.require_api_key()?.clone();
        let completions_url = completions_url(&config.endpoint_url()?)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.completion.timeout_secs))
            .build()?;

        if config.vector_store.token.is_some() {
            tracing::debug!("Vector store token present; not used by the dialogue");
        }

        Ok(Self {
            client,
            completions_url,
            model: config.completion.model.clone(),
            api_key,
        })
    }

    /// Model requests are sent with
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Full URL of the completions endpoint
    pub fn completions_url(&self) -> &Url {
        &self.completions_url
    }

    fn build_request<'a>(
        &'a self,
        messages: &'a [Message],
        options: Option<&GenerateOptions>,
    ) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages,
            temperature: options.and_then(|o| o.temperature),
            max_tokens: options.and_then(|o| o.max_tokens),
        }
    }

    fn to_llm_response(&self, response: ChatResponse) -> Result<LLMResponse> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| invalid("No choices in response"))?;

        let usage = response.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u
                .total_tokens
                .unwrap_or(u.prompt_tokens.saturating_add(u.completion_tokens)),
        });

        Ok(LLMResponse {
            content: choice.message.content.unwrap_or_default(),
            usage,
            model: response.model.unwrap_or_else(|| self.model.clone()),
        })
    }
}

/// Append `chat/completions` to the configured base URL
fn completions_url(base: &Url) -> Result<Url> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join("chat/completions")
        .map_err(|e| DuologueError::config(format!("Invalid endpoint '{}': {}", base, e)))
}

fn invalid(reason: impl Into<String>) -> DuologueError {
    DuologueError::InvalidResponse {
        provider: PROVIDER.to_string(),
        reason: reason.into(),
    }
}

/// Map a non-success status onto an error
fn status_error(status: StatusCode, body: &str) -> DuologueError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => DuologueError::AuthFailed {
            provider: PROVIDER.to_string(),
        },
        StatusCode::TOO_MANY_REQUESTS => DuologueError::RateLimited {
            provider: PROVIDER.to_string(),
        },
        _ => DuologueError::RequestFailed {
            provider: PROVIDER.to_string(),
            reason: format!("HTTP {}: {}", status, body),
        },
    }
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    async fn chat(
        &self,
        messages: &[Message],
        options: Option<GenerateOptions>,
    ) -> Result<LLMResponse> {
        let request = self.build_request(messages, options.as_ref());
        let request_json = serde_json::to_string(&request)?;
        tracing::debug!(url = %self.completions_url, body = %request_json, "Sending chat request");

        let response = self
            .client
            .post(self.completions_url.clone())
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(%status, %body, "Chat response");

        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| invalid(format!("JSON parse error: {}", e)))?;

        self.to_llm_response(parsed)
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}
