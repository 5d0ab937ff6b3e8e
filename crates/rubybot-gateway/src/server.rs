// SPDX-FileCopyrightText: 2026 TopV1 Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.

use std::sync::Arc;

use axum::{Router, middleware as axum_middleware, routing::get};
use rubybot_core::RubyError;
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::WebhookHandler;
use crate::auth::{SecretConfig, secret_middleware};
use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub handler: Arc<dyn WebhookHandler>,
}

/// Gateway server configuration (mirrors `[server]` plus the webhook secret).
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub webhook_secret: Option<String>,
}

impl GatewayConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Builds the webhook router. Every path behaves the same:
///
/// - GET: liveness text
/// - POST: webhook delivery
/// - anything else: 405
pub fn router(handler: Arc<dyn WebhookHandler>, webhook_secret: Option<String>) -> Router {
    let state = GatewayState { handler };
    let secret = SecretConfig {
        secret: webhook_secret,
    };

    let endpoint = || {
        get(handlers::liveness)
            .post(handlers::webhook)
            .fallback(handlers::method_not_allowed)
    };

    Router::new()
        .route("/", endpoint())
        .route("/{*path}", endpoint())
        .route_layer(axum_middleware::from_fn_with_state(
            secret,
            secret_middleware,
        ))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

/// Binds the listener and serves until `shutdown` is cancelled.
pub async fn start_server(
    config: &GatewayConfig,
    handler: Arc<dyn WebhookHandler>,
    shutdown: CancellationToken,
) -> Result<(), RubyError> {
    let app = router(handler, config.webhook_secret.clone());

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| RubyError::Channel {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| RubyError::Channel {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("Gateway server stopped");
    Ok(())
}
