//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use crate::commands::builtin::BUILTIN_COMMANDS;
use regex::Regex;
use std::collections::HashSet;
use thiserror::Error;

/// Longest accepted announcement interval (one week).
pub const MAX_INTERVAL_SECS: u64 = 7 * 24 * 60 * 60;

/// Validation errors for configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("bot.command_marker must not be whitespace or a quote, got {0:?}")]
    InvalidMarker(char),
    #[error("outbox.capacity must be greater than zero")]
    ZeroCapacity,
    #[error("{section} entry has an empty name")]
    EmptyName { section: &'static str },
    #[error("{section} name '{name}' is used more than once")]
    DuplicateName { section: &'static str, name: String },
    #[error("announcement '{0}' needs interval_secs greater than zero")]
    ZeroInterval(String),
    #[error("announcement '{0}' interval_secs exceeds one week")]
    IntervalTooLong(String),
    #[error("announcement '{0}' cannot be used as a command name")]
    InvalidCommandName(String),
    #[error("announcement '{0}' would replace the built-in command of that name")]
    ReservedName(String),
    #[error("announcement '{0}' needs every of at least 1")]
    ZeroEvery(String),
    #[error("announcement '{0}' has no channel")]
    MissingChannel(String),
    #[error("reply '{name}' pattern does not compile: {reason}")]
    InvalidPattern { name: String, reason: String },
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let marker = config.bot.command_marker;
    if marker.is_whitespace() || marker == '"' {
        errors.push(ValidationError::InvalidMarker(marker));
    }
    if config.outbox.capacity == 0 {
        errors.push(ValidationError::ZeroCapacity);
    }

    check_names(
        "announcements",
        config.announcements.iter().map(|a| a.name.as_str()),
        &mut errors,
    );
    for a in &config.announcements {
        if a.interval_secs == 0 {
            errors.push(ValidationError::ZeroInterval(a.name.clone()));
        } else if a.interval_secs > MAX_INTERVAL_SECS {
            errors.push(ValidationError::IntervalTooLong(a.name.clone()));
        }
        // The announcement name doubles as its control command.
        if a.name.chars().any(|c| c.is_whitespace() || c == '"' || c == marker) {
            errors.push(ValidationError::InvalidCommandName(a.name.clone()));
        } else if BUILTIN_COMMANDS
            .iter()
            .any(|builtin| builtin.eq_ignore_ascii_case(&a.name))
        {
            errors.push(ValidationError::ReservedName(a.name.clone()));
        }
        if a.every == 0 {
            errors.push(ValidationError::ZeroEvery(a.name.clone()));
        }
        if a.channel.is_empty() {
            errors.push(ValidationError::MissingChannel(a.name.clone()));
        }
    }

    check_names(
        "replies",
        config.replies.iter().map(|r| r.name.as_str()),
        &mut errors,
    );
    for r in &config.replies {
        if let Err(e) = Regex::new(&r.pattern) {
            errors.push(ValidationError::InvalidPattern {
                name: r.name.clone(),
                reason: e.to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_names<'a>(
    section: &'static str,
    names: impl Iterator<Item = &'a str>,
    errors: &mut Vec<ValidationError>,
) {
    let mut seen = HashSet::new();
    for name in names {
        if name.is_empty() {
            errors.push(ValidationError::EmptyName { section });
        } else if !seen.insert(name.to_lowercase()) {
            errors.push(ValidationError::DuplicateName {
                section,
                name: name.to_string(),
            });
        }
    }
}
