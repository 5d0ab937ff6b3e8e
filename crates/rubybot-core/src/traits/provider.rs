// SPDX-FileCopyrightText: 2026 TopV1 Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion service trait for LLM integrations.

use async_trait::async_trait;

use crate::error::RubyError;
use crate::traits::adapter::PluginAdapter;
use crate::types::CompletionRequest;

/// Single-shot text completion.
///
/// Implementations must not retry internally; the caller owns fallback
/// behaviour.
#[async_trait]
pub trait CompletionService: PluginAdapter {
    /// Returns the completion text, or an error if none could be produced.
    async fn complete(&self, request: CompletionRequest) -> Result<String, RubyError>;
}
