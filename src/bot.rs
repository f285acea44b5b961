//! The bot: command dispatch and module fan-in behind one inbound loop.

use crate::commands::builtin::help_command;
use crate::commands::{
    Command, CommandArgs, CommandRegistry, Dispatcher, ErrorReplyPolicy, HandlerResult,
};
use crate::config::{Config, ConfigError, ValidationError, validate};
use crate::message::{IncomingCommand, IncomingMessage};
use crate::modules::{AnnouncementModule, Module, ModuleHost, PatternReplyModule};
use crate::outbox::Outbox;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Default command marker.
pub const DEFAULT_MARKER: char = '!';

/// Command registry, dispatcher and module host sharing one outbox.
pub struct Bot {
    marker: char,
    registry: Arc<CommandRegistry>,
    dispatcher: Dispatcher,
    modules: ModuleHost,
    outbox: Outbox,
    shutdown: CancellationToken,
}

impl Bot {
    /// A bot with no commands or modules.
    ///
    /// Cancelling `shutdown` stops [`Bot::run`] and every module listener.
    pub fn new(outbox: Outbox, shutdown: CancellationToken) -> Self {
        let registry = Arc::new(CommandRegistry::new());
        Self {
            marker: DEFAULT_MARKER,
            dispatcher: Dispatcher::new(registry.clone(), outbox.clone()),
            registry,
            modules: ModuleHost::new(outbox.clone(), shutdown.clone()),
            outbox,
            shutdown,
        }
    }

    pub fn with_marker(mut self, marker: char) -> Self {
        self.marker = marker;
        self
    }

    pub fn with_error_policy(mut self, policy: ErrorReplyPolicy) -> Self {
        self.dispatcher = self.dispatcher.with_policy(policy);
        self
    }

    /// Build a bot from configuration: `help`, every announcement (with its
    /// command) and every pattern reply.
    ///
    /// The configuration is validated first. Must be called from within a
    /// tokio runtime.
    pub fn from_config(
        config: &Config,
        outbox: Outbox,
        shutdown: CancellationToken,
    ) -> Result<Self, ConfigError> {
        validate(config).map_err(ConfigError::Invalid)?;
        let bot = Self::new(outbox, shutdown)
            .with_marker(config.bot.command_marker)
            .with_error_policy(config.bot.error_policy());
        bot.add_command(help_command(&bot.registry, bot.marker));

        for announcement in &config.announcements {
            let module = Arc::new(AnnouncementModule::from_config(announcement));
            bot.add_command(module.command());
            bot.add_module(module);
        }

        for reply in &config.replies {
            let module = PatternReplyModule::from_config(reply).map_err(|e| {
                ConfigError::Invalid(vec![ValidationError::InvalidPattern {
                    name: reply.name.clone(),
                    reason: e.to_string(),
                }])
            })?;
            bot.add_module(Arc::new(module));
        }

        info!(
            commands = bot.registry.len(),
            modules = bot.modules.len(),
            marker = %bot.marker,
            "bot configured"
        );
        Ok(bot)
    }

    /// Register a command; a later registration under the same name wins.
    pub fn add_command(&self, command: Command) {
        self.registry.register(command);
    }

    /// Register a module and start its external trigger listener.
    pub fn add_module(&self, module: Arc<dyn Module>) {
        self.modules.register(module);
    }

    /// Register a command whose handler also receives `module`.
    pub fn add_module_command<M>(
        &self,
        module: &Arc<M>,
        name: impl Into<String>,
        description: impl Into<String>,
        handler: impl Fn(&M, &CommandArgs) -> HandlerResult + Send + Sync + 'static,
    ) where
        M: Module + 'static,
    {
        self.add_command(Command::for_module(name, description, module.clone(), handler));
    }

    /// Registered commands, sorted by name.
    pub fn list_commands(&self) -> Vec<Arc<Command>> {
        self.registry.list()
    }

    pub fn registry(&self) -> &Arc<CommandRegistry> {
        &self.registry
    }

    pub fn marker(&self) -> char {
        self.marker
    }

    pub fn outbox(&self) -> &Outbox {
        &self.outbox
    }

    /// Process one inbound message: dispatch it if it is a command, then
    /// evaluate every module's message trigger.
    pub async fn handle_message(&self, message: &IncomingMessage) {
        match IncomingCommand::parse(message, self.marker) {
            Some(Ok(command)) => {
                // Already logged and reported by the dispatcher.
                let _ = self.dispatcher.dispatch(&command).await;
            }
            Some(Err(e)) => self.dispatcher.report(message, &e).await,
            None => {}
        }
        self.modules.on_message(message).await;
    }

    /// Process inbound messages one at a time, in arrival order, until the
    /// queue closes or the bot is shut down. Stops module listeners on exit.
    pub async fn run(&self, mut inbound: mpsc::Receiver<IncomingMessage>) {
        info!("bot running");
        loop {
            let message = tokio::select! {
                _ = self.shutdown.cancelled() => break,
                message = inbound.recv() => match message {
                    Some(message) => message,
                    None => {
                        debug!("inbound queue closed");
                        break;
                    }
                },
            };
            self.handle_message(&message).await;
        }
        self.modules.shutdown().await;
        info!("bot stopped");
    }

    /// Stop the inbound loop and every module listener.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}
