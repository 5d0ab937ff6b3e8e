// SPDX-FileCopyrightText: 2026 TopV1 Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./rubybot.toml` > `~/.config/rubybot/rubybot.toml` > `/etc/rubybot/rubybot.toml`
//! with environment variable overrides.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::RubyConfig;

/// Unprefixed variables understood for drop-in compatibility with existing deployments.
const WORKER_ENV_VARS: &[&str] = &["TELEGRAM_BOT_TOKEN", "OPENAI_API_KEY", "ADMIN_USER_IDS"];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/rubybot/rubybot.toml` (system-wide)
/// 3. `~/.config/rubybot/rubybot.toml` (user XDG config)
/// 4. `./rubybot.toml` (local directory)
/// 5. `TELEGRAM_BOT_TOKEN`, `OPENAI_API_KEY`, `ADMIN_USER_IDS`
/// 6. `RUBYBOT_*` environment variables
pub fn load_config() -> Result<RubyConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<RubyConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RubyConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<RubyConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RubyConfig::default()))
        .merge(Toml::file(path))
        .merge(worker_env_provider())
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(RubyConfig::default()))
        .merge(Toml::file("/etc/rubybot/rubybot.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("rubybot/rubybot.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("rubybot.toml"))
        .merge(worker_env_provider())
        .merge(env_provider())
}

/// `RUBYBOT_*` variables, mapped with an explicit section prefix.
///
/// `Env::split("_")` would turn `RUBYBOT_TELEGRAM_BOT_TOKEN` into
/// `telegram.bot.token`; only the first underscore after the section is a
/// separator.
fn env_provider() -> Env {
    Env::prefixed("RUBYBOT_")
        .map(|key| map_prefixed_key(&key.as_str().to_ascii_lowercase()).into())
}

fn worker_env_provider() -> Env {
    Env::raw()
        .only(WORKER_ENV_VARS)
        .map(|key| map_worker_key(&key.as_str().to_ascii_lowercase()).into())
}

/// Maps a lowercased, prefix-stripped env key onto its dotted config path.
pub fn map_prefixed_key(key: &str) -> String {
    for section in ["bot", "telegram", "openai", "storage", "server"] {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

/// Maps an unprefixed deployment variable onto its dotted config path.
pub fn map_worker_key(key: &str) -> String {
    match key {
        "telegram_bot_token" => "telegram.bot_token".to_string(),
        "openai_api_key" => "openai.api_key".to_string(),
        "admin_user_ids" => "telegram.admin_user_ids".to_string(),
        other => other.to_string(),
    }
}
