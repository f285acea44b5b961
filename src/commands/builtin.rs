//! Built-in commands.

use super::command::{Command, CommandArgs, Parameter};
use super::registry::CommandRegistry;
use crate::message::OutgoingMessage;
use std::sync::{Arc, Weak};

/// Names of the commands [`crate::Bot::from_config`] always registers.
pub const BUILTIN_COMMANDS: &[&str] = &["help"];

/// `help [command]`: list commands, or describe one.
///
/// Holds the registry weakly since the registry owns this command.
pub fn help_command(registry: &Arc<CommandRegistry>, marker: char) -> Command {
    let registry: Weak<CommandRegistry> = Arc::downgrade(registry);
    Command::new("help", "List commands or describe one", move |args: &CommandArgs| {
        let Some(registry) = registry.upgrade() else {
            return Ok(None);
        };

        let text = match args.get("command") {
            Some(name) => match registry.lookup(name) {
                Some(cmd) => {
                    let mut text = format!("{marker}{}", cmd.usage());
                    if !cmd.description().is_empty() {
                        text.push_str(" - ");
                        text.push_str(cmd.description());
                    }
                    let subs: Vec<_> = cmd.subcommands().iter().map(|s| s.name()).collect();
                    if !subs.is_empty() {
                        text.push_str(&format!(" (subcommands: {})", subs.join(", ")));
                    }
                    text
                }
                None => format!("No such command: {name}"),
            },
            None => {
                let names: Vec<_> = registry
                    .list()
                    .iter()
                    .filter(|cmd| args.elevated || !cmd.requires_elevated())
                    .map(|cmd| format!("{marker}{}", cmd.name()))
                    .collect();
                format!("Commands: {}", names.join(" "))
            }
        };

        Ok(Some(OutgoingMessage::reply(text)))
    })
    .param(Parameter::optional("command"))
}
