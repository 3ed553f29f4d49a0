//! OpenAI-compatible chat completions client

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tracing::{debug, error, info};

use super::types::*;
use super::{ChatModel, Completion};
use crate::agents::Agent;
use crate::config::LlmConfig;
use crate::message::Message;
use crate::tools::RetryPolicy;

/// Non-2xx answer from the API
#[derive(Debug, thiserror::Error)]
#[error("API error ({status}): {message}")]
pub struct ApiStatusError {
    pub status: reqwest::StatusCode,
    pub message: String,
}

impl ApiStatusError {
    /// Rate limits and server errors may succeed later; other 4xx will not
    pub fn is_retryable(&self) -> bool {
        self.status == reqwest::StatusCode::TOO_MANY_REQUESTS || self.status.is_server_error()
    }
}

pub struct ChatCompletionsClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: Option<u32>,
    retry: RetryPolicy,
}

impl ChatCompletionsClient {
    pub fn new(config: &LlmConfig, api_key: impl Into<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            retry: RetryPolicy::new(
                config.max_retries.saturating_add(1),
                Duration::from_secs(1),
                Duration::from_secs(8),
            ),
        })
    }

    /// Read the API key from the environment variable named in the config
    pub fn from_env(config: &LlmConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).with_context(|| {
            format!("{} is not set (add it to your environment or .env)", config.api_key_env)
        })?;
        Self::new(config, api_key)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key)).context("Invalid API key")?,
        );
        Ok(headers)
    }

    fn build_request(&self, agent: &Agent, history: &[Message]) -> ChatRequest {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(WireMessage::system(agent.instructions()));
        messages.extend(history.iter().map(WireMessage::from));

        ChatRequest {
            model: self.model.clone(),
            messages,
            tools: agent.tools().iter().map(ToolDefinition::from).collect(),
            max_tokens: self.max_tokens,
        }
    }

    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .headers(self.headers()?)
            .json(request)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            let message = match serde_json::from_str::<ApiErrorBody>(&error_text) {
                Ok(body) => body.error.message,
                Err(_) => error_text,
            };
            return Err(ApiStatusError { status, message }.into());
        }

        response
            .json()
            .await
            .context("Failed to parse API response")
    }
}

#[async_trait]
impl ChatModel for ChatCompletionsClient {
    async fn complete(&self, agent: &Agent, history: &[Message]) -> Result<Completion> {
        let request = self.build_request(agent, history);

        let mut attempt = 0u32;
        let response = loop {
            attempt += 1;
            match self.send(&request).await {
                Ok(response) => break response,
                Err(e) => {
                    error!("Chat request failed (attempt {}): {:#}", attempt, e);
                    let retryable = e
                        .downcast_ref::<ApiStatusError>()
                        .map_or(true, ApiStatusError::is_retryable);
                    if !retryable || attempt >= self.retry.attempts {
                        return Err(e.context(format!("Model {} gave no answer", self.model)));
                    }
                    tokio::time::sleep(self.retry.delay(attempt)).await;
                }
            }
        };

        if let Some(usage) = response.usage {
            info!(
                "{} usage: prompt {} tokens, completion {} tokens",
                agent.name(),
                usage.prompt_tokens,
                usage.completion_tokens
            );
        }

        let choice = response
            .choices
            .into_iter()
            .next()
            .context("API response contained no choices")?;
        debug!("finish_reason: {:?}", choice.finish_reason);

        Ok(Completion {
            content: choice.message.content,
            tool_calls: choice
                .message
                .tool_calls
                .unwrap_or_default()
                .into_iter()
                .map(Into::into)
                .collect(),
        })
    }
}
