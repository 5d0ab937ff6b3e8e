// SPDX-FileCopyrightText: 2026 TopV1 Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Update intake for long polling and webhook payloads.

use std::sync::Arc;

use rubybot_core::error::RubyError;
use rubybot_engine::Dispatcher as EventDispatcher;
use teloxide::prelude::*;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::handler;

/// Interprets a raw webhook body as a teloxide update.
///
/// teloxide's `Update` only decodes its kind from a text deserializer; going
/// through `serde_json::Value` yields `UpdateKind::Error` for every payload.
pub fn parse_update(body: &[u8]) -> Result<Update, RubyError> {
    serde_json::from_slice(body).map_err(|e| RubyError::Channel {
        message: format!("invalid update payload: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Converts an update and hands it to the dispatcher. Unsupported updates are
/// a no-op.
pub async fn dispatch_update(
    dispatcher: &EventDispatcher,
    update: &Update,
) -> Result<(), RubyError> {
    match handler::update_to_event(update) {
        Some(event) => dispatcher.handle(event).await,
        None => Ok(()),
    }
}

/// Runs long polling until `shutdown` is cancelled.
///
/// Handler errors are logged and the update is dropped; polling continues.
pub async fn run_polling(bot: Bot, dispatcher: Arc<EventDispatcher>, shutdown: CancellationToken) {
    let on_message = dispatcher.clone();
    let on_callback = dispatcher;

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(move |msg: Message| {
            let dispatcher = on_message.clone();
            async move {
                if let Some(event) = handler::message_to_event(&msg)
                    && let Err(e) = dispatcher.handle(event).await
                {
                    error!(chat_id = msg.chat.id.0, error = %e, "failed to handle message");
                }
                respond(())
            }
        }))
        .branch(
            Update::filter_callback_query().endpoint(move |query: CallbackQuery| {
                let dispatcher = on_callback.clone();
                async move {
                    if let Some(event) = handler::callback_to_event(&query)
                        && let Err(e) = dispatcher.handle(event).await
                    {
                        error!(user_id = query.from.id.0, error = %e, "failed to handle callback");
                    }
                    respond(())
                }
            }),
        );

    let mut polling = Dispatcher::builder(bot, handler)
        .default_handler(|upd| async move {
            debug!(update_id = upd.id.0, "ignoring unsupported update");
        })
        .build();

    let stop = polling.shutdown_token();
    tokio::spawn(async move {
        shutdown.cancelled().await;
        info!("stopping Telegram long polling");
        if let Ok(done) = stop.shutdown() {
            done.await;
        }
    });

    info!("starting Telegram long polling");
    polling.dispatch().await;
    info!("Telegram long polling stopped");
}
