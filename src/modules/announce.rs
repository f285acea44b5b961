//! Timed channel announcements.

use super::{Module, ModuleArgs, TriggerStream, filter_trigger, interval_trigger};
use crate::commands::{Command, CommandArgs, HandlerResult};
use crate::config::AnnouncementConfig;
use crate::message::OutgoingMessage;
use async_trait::async_trait;
use futures_util::StreamExt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::info;

/// Posts a fixed message to a channel on every Nth interval tick.
#[derive(Debug)]
pub struct AnnouncementModule {
    name: String,
    channel: String,
    message: String,
    interval: Duration,
    every: u64,
    paused: AtomicBool,
}

impl AnnouncementModule {
    pub fn new(
        name: impl Into<String>,
        channel: impl Into<String>,
        message: impl Into<String>,
        interval: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            channel: channel.into(),
            message: message.into(),
            interval,
            every: 1,
            paused: AtomicBool::new(false),
        }
    }

    /// Only announce on every `n`th tick. Zero is treated as one.
    pub fn every(mut self, n: u64) -> Self {
        self.every = n.max(1);
        self
    }

    pub fn from_config(config: &AnnouncementConfig) -> Self {
        Self::new(
            &config.name,
            &config.channel,
            &config.message,
            Duration::from_secs(config.interval_secs),
        )
        .every(config.every)
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::Relaxed);
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::Relaxed);
    }

    /// Elevated command named after this announcement.
    ///
    /// Without a subcommand it reports the state; `pause` and `resume`
    /// toggle it.
    pub fn command(self: &Arc<Self>) -> Command {
        Command::for_module(
            self.name.clone(),
            format!("Show or toggle the '{}' announcement", self.name),
            self.clone(),
            Self::status,
        )
        .elevated()
        .subcommand(Command::for_module(
            "pause",
            "Stop announcing",
            self.clone(),
            |module: &Self, args: &CommandArgs| {
                module.pause();
                info!(announcement = %module.name, by = %args.sender, "announcement paused");
                Ok(Some(OutgoingMessage::reply(format!("{} paused", module.name))))
            },
        ))
        .subcommand(Command::for_module(
            "resume",
            "Resume announcing",
            self.clone(),
            |module: &Self, args: &CommandArgs| {
                module.resume();
                info!(announcement = %module.name, by = %args.sender, "announcement resumed");
                Ok(Some(OutgoingMessage::reply(format!("{} resumed", module.name))))
            },
        ))
    }

    fn status(&self, _args: &CommandArgs) -> HandlerResult {
        let state = if self.is_paused() { "paused" } else { "active" };
        let every = match self.every {
            1 => String::new(),
            n => format!(", every {n} ticks"),
        };
        Ok(Some(OutgoingMessage::reply(format!(
            "{} is {state} (#{} every {}s{every})",
            self.name,
            self.channel,
            self.interval.as_secs()
        ))))
    }
}

#[async_trait]
impl Module for AnnouncementModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn external_trigger(&self) -> Option<TriggerStream> {
        let every = self.every;
        let mut ticks = 0u64;
        let channel = self.channel.clone();
        let source = filter_trigger(interval_trigger(self.interval), move |_| {
            ticks += 1;
            ticks % every == 0
        });
        Some(
            source
                .map(move |args| ModuleArgs {
                    channel: channel.clone(),
                    ..args
                })
                .boxed(),
        )
    }

    async fn handle(&self, args: ModuleArgs) -> HandlerResult {
        if self.is_paused() {
            return Ok(None);
        }
        Ok(Some(OutgoingMessage::say(&self.message).to_channel(args.channel)))
    }
}
