// SPDX-FileCopyrightText: 2026 TopV1 Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reply generation with deterministic fallbacks.
//!
//! [`ResponseGenerator::generate`] never fails: a completion error, a
//! timeout, or an empty completion all resolve to one of the fixed
//! [`FALLBACK_RESPONSES`](crate::templates::FALLBACK_RESPONSES), picked by the
//! user's exchange count.

use std::sync::Arc;
use std::time::Duration;

use rubybot_config::model::OpenAiConfig;
use rubybot_core::RubyError;
use rubybot_core::traits::CompletionService;
use rubybot_core::types::{CompletionRequest, UserSnapshot};
use tracing::{debug, warn};

use crate::policy::fallback_index;
use crate::templates::{FALLBACK_RESPONSES, system_prompt};

/// Request parameters for every completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Upper bound on one completion call.
    pub timeout: Duration,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self::from(&OpenAiConfig::default())
    }
}

impl From<&OpenAiConfig> for GenerationSettings {
    fn from(config: &OpenAiConfig) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

/// Produces Ruby's conversational replies.
#[derive(Clone)]
pub struct ResponseGenerator {
    completion: Arc<dyn CompletionService + Send + Sync>,
    settings: GenerationSettings,
}

impl ResponseGenerator {
    pub fn new(
        completion: Arc<dyn CompletionService + Send + Sync>,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            completion,
            settings,
        }
    }

    /// Generates a reply to `message` for `user`. Makes at most one call.
    pub async fn generate(&self, message: &str, user: &UserSnapshot) -> String {
        match self.try_generate(message, user).await {
            Ok(text) => text,
            Err(e) => {
                warn!(
                    telegram_id = user.telegram_id,
                    error = %e,
                    "completion failed, using fallback reply"
                );
                fallback_reply(user.exchange_count).to_string()
            }
        }
    }

    async fn try_generate(&self, message: &str, user: &UserSnapshot) -> Result<String, RubyError> {
        let request = CompletionRequest {
            model: self.settings.model.clone(),
            system_prompt: system_prompt(user),
            user_message: message.to_string(),
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };

        let timeout = self.settings.timeout;
        let text = tokio::time::timeout(timeout, self.completion.complete(request))
            .await
            .map_err(|_| RubyError::Timeout { duration: timeout })??;

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(RubyError::provider("completion was empty"));
        }
        debug!(telegram_id = user.telegram_id, len = trimmed.len(), "reply generated");
        Ok(trimmed.to_string())
    }
}

/// The fixed reply used when generation fails at `exchange_count`.
pub fn fallback_reply(exchange_count: u32) -> &'static str {
    FALLBACK_RESPONSES[fallback_index(exchange_count, FALLBACK_RESPONSES.len())]
}
