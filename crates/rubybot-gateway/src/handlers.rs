// SPDX-FileCopyrightText: 2026 TopV1 Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the webhook gateway.

use axum::{
    body::Bytes,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::server::GatewayState;

pub const LIVENESS_BODY: &str = "Ruby Bot is running! 🤖✨";
pub const OK_BODY: &str = "OK";
pub const ERROR_BODY: &str = "Internal Server Error";
pub const METHOD_NOT_ALLOWED_BODY: &str = "Method not allowed";

/// GET on any path
pub async fn liveness() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain")],
        LIVENESS_BODY,
    )
        .into_response()
}

/// POST on any path
///
/// The body is parsed here rather than with the `Json` extractor so that a
/// malformed payload yields the same 500 as a handler failure.
pub async fn webhook(State(state): State<GatewayState>, body: Bytes) -> Response {
    if let Err(e) = serde_json::from_slice::<serde_json::Value>(&body) {
        tracing::error!(error = %e, "webhook body is not valid JSON");
        return (StatusCode::INTERNAL_SERVER_ERROR, ERROR_BODY).into_response();
    }

    match state.handler.handle_update(&body).await {
        Ok(()) => (StatusCode::OK, OK_BODY).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "webhook handler failed");
            (StatusCode::INTERNAL_SERVER_ERROR, ERROR_BODY).into_response()
        }
    }
}

/// Any other method.
pub async fn method_not_allowed() -> Response {
    (StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED_BODY).into_response()
}
