// SPDX-FileCopyrightText: 2026 TopV1 Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! rubybot - Ruby, the TopV1 community ambassador on Telegram.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rubybot_config::RubyConfig;

/// rubybot - Ruby, the TopV1 community ambassador on Telegram.
#[derive(Parser, Debug)]
#[command(name = "rubybot", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG lookup.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the Telegram webhook over HTTP.
    Serve,
    /// Fetch updates with long polling instead of a webhook.
    Poll,
    /// Validate configuration and print the effective settings.
    Config,
}

fn load_config(path: Option<&PathBuf>) -> RubyConfig {
    let loaded = match path {
        Some(path) => rubybot_config::load_and_validate_path(path),
        None => rubybot_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            rubybot_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

/// Human-readable summary of the effective configuration. Secrets are only
/// reported as set or unset.
fn describe_config(config: &RubyConfig) -> String {
    let set = |value: &Option<String>| {
        if value.as_deref().is_some_and(|v| !v.is_empty()) {
            "set"
        } else {
            "unset"
        }
    };
    format!(
        "bot.name = {}\n\
         bot.log_level = {}\n\
         telegram.bot_token = {}\n\
         telegram.admin_user_ids = {} configured\n\
         telegram.webhook_secret = {}\n\
         openai.api_key = {}\n\
         openai.model = {}\n\
         openai.max_tokens = {}\n\
         openai.temperature = {}\n\
         openai.timeout_secs = {}\n\
         storage.database_path = {}\n\
         server = {}:{}",
        config.bot.name,
        config.bot.log_level,
        set(&config.telegram.bot_token),
        config.telegram.admin_user_ids.len(),
        set(&config.telegram.webhook_secret),
        set(&config.openai.api_key),
        config.openai.model,
        config.openai.max_tokens,
        config.openai.temperature,
        config.openai.timeout_secs,
        config.storage.database_path,
        config.server.bind_address,
        config.server.port,
    )
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref());

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Poll) => serve::run_poll(config).await,
        Some(Commands::Config) => {
            println!("rubybot: configuration is valid\n{}", describe_config(&config));
            Ok(())
        }
        None => {
            println!("rubybot: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("rubybot: {e}");
        std::process::exit(1);
    }
}
