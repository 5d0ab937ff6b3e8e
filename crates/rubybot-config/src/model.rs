// SPDX-FileCopyrightText: 2026 TopV1 Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for rubybot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Deserializer, Serialize};

/// Top-level rubybot configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RubyConfig {
    /// Bot identity and logging.
    #[serde(default)]
    pub bot: BotConfig,

    /// Telegram bot integration settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// OpenAI chat-completions settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Webhook server settings.
    #[serde(default)]
    pub server: ServerConfig,
}

/// Bot identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Display name used in logs and health output.
    #[serde(default = "default_bot_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_bot_name() -> String {
    "ruby".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telegram bot integration configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. Required to run either transport.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Telegram user ids allowed to run admin commands.
    ///
    /// Accepts a TOML array, a single integer, or a comma separated string
    /// (`"123,456"`) so the value can come straight from an env var.
    #[serde(default, deserialize_with = "deserialize_id_list")]
    pub admin_user_ids: Vec<i64>,

    /// Shared secret expected in `X-Telegram-Bot-Api-Secret-Token`.
    #[serde(default)]
    pub webhook_secret: Option<String>,
}

/// OpenAI chat-completions configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// API key. `None` falls back to the `OPENAI_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model used for reply generation.
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum tokens to generate per reply.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature (0.0 - 2.0).
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Upper bound on a single completion call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// API base URL; override for compatible gateways.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
            base_url: default_base_url(),
        }
    }
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_max_tokens() -> u32 {
    150
}

fn default_temperature() -> f32 {
    0.8
}

fn default_timeout_secs() -> u64 {
    20
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("rubybot").join("rubybot.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("rubybot.db"))
        .display()
        .to_string()
}

fn default_wal_mode() -> bool {
    true
}

/// Webhook server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind the webhook listener to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdEntry {
    Int(i64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdList {
    Many(Vec<IdEntry>),
    One(IdEntry),
}

/// Parses admin ids from a list, a single integer, or a comma separated string.
///
/// Blank entries are skipped; anything else that is not an integer is rejected.
fn deserialize_id_list<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = match IdList::deserialize(deserializer)? {
        IdList::Many(entries) => entries,
        IdList::One(entry) => vec![entry],
    };

    let mut ids = Vec::new();
    for entry in entries {
        match entry {
            IdEntry::Int(id) => ids.push(id),
            IdEntry::Text(text) => {
                for part in text.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                    let id = part.parse::<i64>().map_err(|_| {
                        serde::de::Error::custom(format!("`{part}` is not a Telegram user id"))
                    })?;
                    ids.push(id);
                }
            }
        }
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Wrapper {
        #[serde(deserialize_with = "deserialize_id_list")]
        ids: Vec<i64>,
    }

    fn parse(toml_src: &str) -> Result<Vec<i64>, toml::de::Error> {
        toml::from_str::<Wrapper>(toml_src).map(|w| w.ids)
    }

    #[test]
    fn admin_ids_from_array() {
        assert_eq!(parse("ids = [1, 22, 333]").unwrap(), vec![1, 22, 333]);
    }

    #[test]
    fn admin_ids_from_single_integer() {
        assert_eq!(parse("ids = 42").unwrap(), vec![42]);
    }

    #[test]
    fn admin_ids_from_comma_string() {
        assert_eq!(parse(r#"ids = "10, 20,,30 ""#).unwrap(), vec![10, 20, 30]);
    }

    #[test]
    fn admin_ids_reject_garbage() {
        assert!(parse(r#"ids = "10,abc""#).is_err());
    }

    #[test]
    fn defaults_match_reply_generation_settings() {
        let openai = OpenAiConfig::default();
        assert_eq!(openai.model, "gpt-3.5-turbo");
        assert_eq!(openai.max_tokens, 150);
        assert!((openai.temperature - 0.8).abs() < f32::EPSILON);
        assert!(openai.api_key.is_none());
    }

    #[test]
    fn default_database_path_names_rubybot() {
        assert!(StorageConfig::default().database_path.ends_with("rubybot.db"));
    }
}
