// SPDX-FileCopyrightText: 2026 TopV1 Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Config diagnostics.
//!
//! Figment errors become [`ConfigError`]s that miette can render with the
//! offending line of `rubybot.toml` highlighted. Unknown keys get a
//! "did you mean" hint from Jaro-Winkler similarity.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Typos such as `tempreature` or `admin_user_id` score above this.
const SUGGESTION_THRESHOLD: f64 = 0.75;

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("unknown key `{key}` in {}", section_label(section))]
    #[diagnostic(code(rubybot::config::unknown_key), help("{}", unknown_key_help(suggestion.as_deref(), valid_keys)))]
    UnknownKey {
        /// Table the key appeared in; empty for the top level.
        section: String,
        key: String,
        suggestion: Option<String>,
        valid_keys: Vec<String>,
        #[label("not a rubybot setting")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("`{key}` has the wrong type: found {found}")]
    #[diagnostic(code(rubybot::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        key: String,
        found: String,
        expected: String,
    },

    #[error("`{key}` is required")]
    #[diagnostic(code(rubybot::config::missing_key), help("set `{key}` in rubybot.toml or the environment"))]
    MissingKey { key: String },

    #[error("invalid value for `{key}`: {message}")]
    #[diagnostic(code(rubybot::config::validation))]
    Validation { key: String, message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(rubybot::config::other))]
    Other(String),
}

impl ConfigError {
    /// Shorthand for a failed semantic check on `key`.
    pub fn invalid(key: &str, message: impl Into<String>) -> Self {
        ConfigError::Validation {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

fn section_label(section: &str) -> String {
    if section.is_empty() {
        "the top level".to_string()
    } else {
        format!("[{section}]")
    }
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &[String]) -> String {
    let valid = valid_keys.join(", ");
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid}"),
        None => format!("valid keys: {valid}"),
    }
}

/// TOML files that fed the figment, keyed by display path.
pub type TomlSources = [(String, String)];

/// Converts every error inside a `figment::Error` into a diagnostic.
pub fn figment_to_config_errors(err: figment::Error, toml_sources: &TomlSources) -> Vec<ConfigError> {
    use figment::error::Kind;

    err.into_iter()
        .map(|error| {
            let section = error.path.join(".");
            match &error.kind {
                Kind::UnknownField(key, expected) => {
                    let valid_keys: Vec<String> = expected.iter().map(|k| k.to_string()).collect();
                    let (span, src) = locate(&error, &section, key, toml_sources).unzip();
                    ConfigError::UnknownKey {
                        suggestion: suggest_key(key, expected),
                        section,
                        key: key.clone(),
                        valid_keys,
                        span,
                        src,
                    }
                }
                Kind::MissingField(key) => ConfigError::MissingKey {
                    key: dotted(&section, key),
                },
                Kind::InvalidType(found, expected) => ConfigError::InvalidType {
                    key: section,
                    found: found.to_string(),
                    expected: expected.to_string(),
                },
                _ => ConfigError::Other(error.to_string()),
            }
        })
        .collect()
}

fn dotted(section: &str, key: &str) -> String {
    if section.is_empty() {
        key.to_string()
    } else {
        format!("{section}.{key}")
    }
}

/// Points a diagnostic at `key` inside the file the error came from.
fn locate(
    error: &figment::Error,
    section: &str,
    key: &str,
    toml_sources: &TomlSources,
) -> Option<(SourceSpan, NamedSource<String>)> {
    let figment::Source::File(path) = error.metadata.as_ref()?.source.as_ref()? else {
        return None;
    };
    let path = path.display().to_string();
    let (name, content) = toml_sources.iter().find(|(p, _)| *p == path)?;

    let offset = find_key_offset(content, section, key)?;
    Some((
        SourceSpan::new(offset.into(), key.len()),
        NamedSource::new(name, content.clone()),
    ))
}

/// Byte offset of `key` assigned directly inside the `[section]` table
/// (`""` for the top level). Only the first matching table is searched.
pub fn find_key_offset(content: &str, section: &str, key: &str) -> Option<usize> {
    let mut in_section = section.is_empty();
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        let trimmed = line.trim();
        if let Some(header) = trimmed.strip_prefix('[').and_then(|h| h.strip_suffix(']')) {
            if in_section {
                return None;
            }
            in_section = header.trim() == section;
        } else if in_section
            && let Some((lhs, _)) = trimmed.split_once('=')
            && lhs.trim() == key
        {
            let indent = line.len() - line.trim_start().len();
            return Some(offset + indent);
        }
        offset += line.len();
    }
    None
}

/// Closest valid key by Jaro-Winkler similarity, if any is close enough.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Writes each diagnostic to stderr with miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut out = String::new();
        match handler.render_report(&mut out, error) {
            Ok(()) => eprint!("{out}"),
            Err(_) => eprintln!("error: {error}"),
        }
    }
}
