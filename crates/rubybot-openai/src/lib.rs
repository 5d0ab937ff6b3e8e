// SPDX-FileCopyrightText: 2026 TopV1 Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI chat-completions adapter for rubybot.
//!
//! This crate implements [`CompletionService`] on top of the
//! `/chat/completions` endpoint: a system prompt plus the user's message in,
//! one text reply out.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use rubybot_config::model::OpenAiConfig;
use rubybot_core::error::RubyError;
use rubybot_core::traits::{CompletionService, PluginAdapter};
use rubybot_core::types::{AdapterType, CompletionRequest, HealthStatus};
use tracing::{debug, info};

use crate::client::OpenAiClient;
use crate::types::{ChatCompletionRequest, ChatMessage};

/// OpenAI completion service implementing [`CompletionService`].
///
/// API key resolution: `openai.api_key` (which the config layer also fills
/// from `OPENAI_API_KEY`), otherwise construction fails.
pub struct OpenAiProvider {
    client: OpenAiClient,
}

impl OpenAiProvider {
    /// Creates a provider from the `[openai]` configuration section.
    pub fn new(config: &OpenAiConfig) -> Result<Self, RubyError> {
        let api_key = resolve_api_key(&config.api_key)?;
        let client = OpenAiClient::new(
            &api_key,
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        )?;

        info!(model = %config.model, endpoint = client.endpoint(), "OpenAI provider initialized");
        Ok(Self { client })
    }

    /// Converts a [`CompletionRequest`] into the chat-completions wire shape.
    fn to_chat_request(request: &CompletionRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: request.model.clone(),
            messages: vec![
                ChatMessage::system(request.system_prompt.clone()),
                ChatMessage::user(request.user_message.clone()),
            ],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }
}

#[async_trait]
impl PluginAdapter for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, RubyError> {
        // Constructed means the key was present; reachability is checked per call.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), RubyError> {
        Ok(())
    }
}

#[async_trait]
impl CompletionService for OpenAiProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<String, RubyError> {
        let chat_request = Self::to_chat_request(&request);
        let response = self.client.complete(&chat_request).await?;

        if let Some(usage) = response.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "completion usage"
            );
        }

        response
            .first_text()
            .map(str::to_string)
            .ok_or_else(|| RubyError::provider("completion contained no text"))
    }
}

/// Resolves the API key from config.
fn resolve_api_key(config_key: &Option<String>) -> Result<String, RubyError> {
    match config_key {
        Some(key) if !key.trim().is_empty() => Ok(key.clone()),
        _ => Err(RubyError::Config(
            "OpenAI API key not found. Set openai.api_key in config or the OPENAI_API_KEY environment variable.".into(),
        )),
    }
}
