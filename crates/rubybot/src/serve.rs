// SPDX-FileCopyrightText: 2026 TopV1 Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `rubybot serve` and `rubybot poll`.
//!
//! Both modes wire the same collaborators (SQLite storage, OpenAI completion,
//! Telegram transport) into one event dispatcher and differ only in how
//! updates arrive.

use std::sync::Arc;

use rubybot_config::RubyConfig;
use rubybot_core::{PluginAdapter, RubyError};
use rubybot_engine::shutdown;
use rubybot_engine::{AdminAllowlist, Dispatcher, GenerationSettings, ResponseGenerator, Stores};
use rubybot_gateway::GatewayConfig;
use rubybot_openai::OpenAiProvider;
use rubybot_storage::SqliteStorage;
use rubybot_telegram::{TelegramChannel, TelegramWebhook};
use tracing::{info, warn};

/// Everything a running bot needs, independent of the update source.
struct App {
    dispatcher: Arc<Dispatcher>,
    channel: TelegramChannel,
    storage: Arc<SqliteStorage>,
}

impl App {
    async fn build(config: &RubyConfig) -> Result<Self, RubyError> {
        let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
        storage.initialize().await?;

        let provider = Arc::new(OpenAiProvider::new(&config.openai)?);
        let channel = TelegramChannel::new(&config.telegram)?;

        let admins = AdminAllowlist::from_config(&config.telegram);
        if admins.is_empty() {
            warn!("no admin user ids configured; admin commands are disabled");
        } else {
            info!(admins = admins.len(), "admin allowlist loaded");
        }

        let responder = ResponseGenerator::new(provider, GenerationSettings::from(&config.openai));
        let dispatcher = Dispatcher::new(
            Stores::from_single(storage.clone()),
            Arc::new(channel.clone()),
            responder,
            Arc::new(admins),
        );

        Ok(Self {
            dispatcher: Arc::new(dispatcher),
            channel,
            storage,
        })
    }

    async fn shutdown(&self) {
        if let Err(e) = self.storage.shutdown().await {
            warn!(error = %e, "storage shutdown failed");
        }
        info!("rubybot stopped");
    }
}

/// Serves the webhook gateway until SIGTERM or Ctrl+C.
pub async fn run_serve(config: RubyConfig) -> Result<(), RubyError> {
    init_tracing(&config.bot.log_level);
    info!(bot = %config.bot.name, "starting rubybot serve");

    let app = App::build(&config).await?;
    let cancel = shutdown::install_signal_handler();

    let gateway = GatewayConfig {
        host: config.server.bind_address.clone(),
        port: config.server.port,
        webhook_secret: config.telegram.webhook_secret.clone(),
    };
    if gateway.webhook_secret.is_none() {
        warn!("telegram.webhook_secret is unset; webhook deliveries are not authenticated");
    }

    let handler = Arc::new(TelegramWebhook::new(app.dispatcher.clone()));
    let served = rubybot_gateway::start_server(&gateway, handler, cancel).await;

    app.shutdown().await;
    served
}

/// Runs long polling until SIGTERM or Ctrl+C.
pub async fn run_poll(config: RubyConfig) -> Result<(), RubyError> {
    init_tracing(&config.bot.log_level);
    info!(bot = %config.bot.name, "starting rubybot poll");

    let app = App::build(&config).await?;
    let cancel = shutdown::install_signal_handler();

    rubybot_telegram::run_polling(app.channel.bot().clone(), app.dispatcher.clone(), cancel)
        .await;

    app.shutdown().await;
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rubybot={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
