//! Configuration loading and management.
//!
//! - [`types`]: config struct definitions and loading
//! - [`validation`]: startup checks, reporting every problem at once
//! - [`defaults`]: serde default functions

mod defaults;
mod types;
pub mod validation;

pub use types::{
    AnnouncementConfig, BotConfig, Config, ConfigError, ConsoleConfig, OutboxConfig, ReplyConfig,
};
pub use validation::{ValidationError, validate};
