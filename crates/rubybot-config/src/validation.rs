// SPDX-FileCopyrightText: 2026 TopV1 Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as valid bind addresses, non-empty paths, and sampling ranges.

use crate::diagnostic::ConfigError;
use crate::model::RubyConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &RubyConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let addr = config.server.bind_address.trim();
    if addr.is_empty() {
        errors.push(ConfigError::invalid("server.bind_address", "must not be empty"));
    } else if !is_bindable(addr) {
        errors.push(ConfigError::invalid(
            "server.bind_address",
            format!("`{addr}` is not an IP address or hostname"),
        ));
    }

    if config.server.port == 0 {
        errors.push(ConfigError::invalid("server.port", "must be between 1 and 65535"));
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::invalid("storage.database_path", "must not be empty"));
    }

    let openai = &config.openai;
    if openai.model.trim().is_empty() {
        errors.push(ConfigError::invalid("openai.model", "must not be empty"));
    }
    if !(0.0..=2.0).contains(&openai.temperature) {
        errors.push(ConfigError::invalid(
            "openai.temperature",
            format!("must be between 0.0 and 2.0, got {}", openai.temperature),
        ));
    }
    if openai.max_tokens == 0 {
        errors.push(ConfigError::invalid("openai.max_tokens", "must be at least 1"));
    }
    if openai.timeout_secs == 0 {
        errors.push(ConfigError::invalid("openai.timeout_secs", "must be at least 1"));
    }

    if config
        .telegram
        .bot_token
        .as_deref()
        .is_some_and(|token| token.trim().is_empty())
    {
        errors.push(ConfigError::invalid("telegram.bot_token", "must not be blank when set"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// IP literal or a plausible hostname.
fn is_bindable(addr: &str) -> bool {
    addr.parse::<std::net::IpAddr>().is_ok()
        || addr
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | ':'))
}
