// SPDX-FileCopyrightText: 2026 TopV1 Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook secret check.
//!
//! Telegram echoes the secret registered with `setWebhook` in
//! `X-Telegram-Bot-Api-Secret-Token`. When a secret is configured, webhook
//! deliveries without a matching header are rejected. Liveness probes are
//! never checked.

use axum::{
    extract::{Request, State},
    http::{Method, StatusCode},
    middleware::Next,
    response::Response,
};

/// Header Telegram uses to echo the webhook secret.
pub const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Expected webhook secret. `None` disables the check.
#[derive(Clone, Default)]
pub struct SecretConfig {
    pub secret: Option<String>,
}

impl std::fmt::Debug for SecretConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretConfig")
            .field("secret", &self.secret.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

impl SecretConfig {
    /// Whether a request carrying `provided` passes the check.
    pub fn accepts(&self, provided: Option<&str>) -> bool {
        match self.secret.as_deref() {
            None => true,
            Some(expected) => provided == Some(expected),
        }
    }
}

/// Rejects `POST` requests whose secret header does not match.
pub async fn secret_middleware(
    State(config): State<SecretConfig>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if request.method() != Method::POST {
        return Ok(next.run(request).await);
    }

    let provided = request
        .headers()
        .get(SECRET_HEADER)
        .and_then(|v| v.to_str().ok());

    if config.accepts(provided) {
        Ok(next.run(request).await)
    } else {
        tracing::warn!("rejecting webhook delivery with missing or wrong secret");
        Err(StatusCode::UNAUTHORIZED)
    }
}
