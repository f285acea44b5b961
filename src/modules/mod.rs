//! Modules: pluggable units reacting to timers, external signals and chat
//! messages, independently of the command system.
//!
//! A module may offer an external trigger source (an async stream the
//! [`host`] listens to on its own task), a per-message trigger evaluated
//! inline with inbound delivery, and a handler that turns a trigger event
//! into an optional outgoing message.

pub mod announce;
pub mod host;
pub mod pattern;
pub mod trigger;

pub use announce::AnnouncementModule;
pub use host::ModuleHost;
pub use pattern::PatternReplyModule;
pub use trigger::{
    TriggerStream, filter_trigger, interval_trigger, merge_triggers, signal_trigger,
};

use crate::commands::HandlerResult;
use crate::message::IncomingMessage;
use async_trait::async_trait;
use std::collections::HashMap;

/// Payload of a trigger event and input to a module handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleArgs {
    pub channel: String,
    pub parameters: HashMap<String, String>,
}

impl ModuleArgs {
    pub fn for_channel(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            ..Default::default()
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }
}

/// Capability contract every module satisfies.
#[async_trait]
pub trait Module: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Source of externally timed events, listened to for the lifetime of
    /// the bot. Called once, at registration.
    fn external_trigger(&self) -> Option<TriggerStream> {
        None
    }

    /// Inspect an inbound message; `Some` fires the handler.
    ///
    /// Runs inline on the inbound path: a slow implementation stalls every
    /// message behind it, so this must not block or do I/O.
    fn message_trigger(&self, _incoming: &IncomingMessage) -> Option<ModuleArgs> {
        None
    }

    /// React to a trigger event.
    async fn handle(&self, args: ModuleArgs) -> HandlerResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_args_builder() {
        let args = ModuleArgs::for_channel("room").with_param("user", "bob");
        assert_eq!(args.channel, "room");
        assert_eq!(args.get("user"), Some("bob"));
        assert_eq!(args.get("missing"), None);
    }
}
