//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use super::defaults::*;
use super::validation::ValidationError;
use crate::commands::ErrorReplyPolicy;
use crate::message::Roles;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {}", join_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Bot configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub outbox: OutboxConfig,
    /// Identity given to lines read from stdin.
    #[serde(default)]
    pub console: ConsoleConfig,
    #[serde(default)]
    pub announcements: Vec<AnnouncementConfig>,
    #[serde(default)]
    pub replies: Vec<ReplyConfig>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load and validate in one step.
    pub fn load_validated<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::load(path)?;
        super::validate(&config).map_err(ConfigError::Invalid)?;
        Ok(config)
    }
}

/// Bot identity and command behavior.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Login the bot runs as.
    #[serde(default = "default_nick")]
    pub nick: String,
    /// Character that starts a command line (default: `!`).
    #[serde(default = "default_command_marker")]
    pub command_marker: char,
    /// Answer user errors (unknown command, bad arguments) in chat.
    #[serde(default)]
    pub error_replies: bool,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            nick: default_nick(),
            command_marker: default_command_marker(),
            error_replies: false,
        }
    }
}

impl BotConfig {
    pub fn error_policy(&self) -> ErrorReplyPolicy {
        if self.error_replies {
            ErrorReplyPolicy::Notify
        } else {
            ErrorReplyPolicy::Silent
        }
    }
}

/// Outgoing queue sizing.
#[derive(Debug, Clone, Deserialize)]
pub struct OutboxConfig {
    /// Queued messages before senders wait (default: 256).
    #[serde(default = "default_outbox_capacity")]
    pub capacity: usize,
    /// How long a sender waits for queue space, in milliseconds (default: 5000).
    #[serde(default = "default_send_timeout_ms")]
    pub send_timeout_ms: u64,
}

impl Default for OutboxConfig {
    fn default() -> Self {
        Self {
            capacity: default_outbox_capacity(),
            send_timeout_ms: default_send_timeout_ms(),
        }
    }
}

impl OutboxConfig {
    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_ms)
    }
}

/// Console transport identity.
#[derive(Debug, Clone, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default = "default_console_channel")]
    pub channel: String,
    #[serde(default = "default_console_sender")]
    pub sender: String,
    #[serde(default = "default_true")]
    pub broadcaster: bool,
    #[serde(default)]
    pub moderator: bool,
    #[serde(default)]
    pub subscriber: bool,
    #[serde(default)]
    pub vip: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            channel: default_console_channel(),
            sender: default_console_sender(),
            broadcaster: true,
            moderator: false,
            subscriber: false,
            vip: false,
        }
    }
}

impl ConsoleConfig {
    pub fn roles(&self) -> Roles {
        Roles {
            broadcaster: self.broadcaster,
            moderator: self.moderator,
            subscriber: self.subscriber,
            vip: self.vip,
        }
    }
}

/// A timed announcement (`[[announcements]]`).
#[derive(Debug, Clone, Deserialize)]
pub struct AnnouncementConfig {
    /// Also the name of the command controlling it.
    pub name: String,
    pub channel: String,
    pub message: String,
    pub interval_secs: u64,
    /// Announce only on every Nth tick (default: 1).
    #[serde(default = "default_every")]
    pub every: u64,
}

/// A pattern-triggered reply (`[[replies]]`).
#[derive(Debug, Clone, Deserialize)]
pub struct ReplyConfig {
    pub name: String,
    /// Regular expression matched against message text.
    pub pattern: String,
    /// Template; `{sender}`, `{channel}` and named captures are substituted.
    pub reply: String,
    #[serde(default)]
    pub as_reply: bool,
}
