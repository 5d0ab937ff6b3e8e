// SPDX-FileCopyrightText: 2026 TopV1 Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP webhook gateway.
//!
//! Serves a liveness probe and accepts Telegram webhook deliveries on any
//! path, so the URL registered with `setWebhook` is free to choose. Bodies that are valid JSON are handed, as raw bytes, to a
//! [`WebhookHandler`]; the gateway itself knows nothing about Telegram update
//! shapes.

pub mod auth;
pub mod handlers;
pub mod server;

use async_trait::async_trait;
use rubybot_core::RubyError;

pub use server::{GatewayConfig, GatewayState, router, start_server};

/// Receives webhook bodies that are known to be valid JSON.
#[async_trait]
pub trait WebhookHandler: Send + Sync + 'static {
    /// Processes one delivery. An error turns into a 500 response so the
    /// platform retries the update.
    async fn handle_update(&self, body: &[u8]) -> Result<(), RubyError>;
}
