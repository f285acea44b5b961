//! Command definitions and the arguments handed to their handlers.

use crate::error::HandlerError;
use crate::message::{OutgoingMessage, Roles};
use crate::modules::Module;
use crate::outbox::Outbox;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Outcome of a handler: an optional message to send.
pub type HandlerResult = Result<Option<OutgoingMessage>, HandlerError>;

/// Command handler function.
pub type CommandHandler = Arc<dyn Fn(&CommandArgs) -> HandlerResult + Send + Sync>;

/// Parameter value check.
pub type Validator = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Whether a parameter must be supplied, and what it falls back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
    Default(String),
}

/// One positional parameter of a command.
///
/// A parameter is either required or optional, optionally with a default;
/// a required parameter with a default cannot be expressed.
#[derive(Clone)]
pub struct Parameter {
    name: String,
    presence: Presence,
    validator: Option<Validator>,
}

impl Parameter {
    pub fn required(name: impl Into<String>) -> Self {
        Self::with_presence(name, Presence::Required)
    }

    pub fn optional(name: impl Into<String>) -> Self {
        Self::with_presence(name, Presence::Optional)
    }

    /// Optional parameter bound to `value` when not supplied.
    pub fn with_default(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::with_presence(name, Presence::Default(value.into()))
    }

    fn with_presence(name: impl Into<String>, presence: Presence) -> Self {
        Self {
            name: name.into(),
            presence,
            validator: None,
        }
    }

    /// Reject values for which `check` returns false.
    pub fn validate(mut self, check: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        self.validator = Some(Arc::new(check));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn presence(&self) -> &Presence {
        &self.presence
    }

    pub fn is_required(&self) -> bool {
        self.presence == Presence::Required
    }

    pub fn default_value(&self) -> Option<&str> {
        match &self.presence {
            Presence::Default(v) => Some(v),
            _ => None,
        }
    }

    pub fn accepts(&self, value: &str) -> bool {
        self.validator.as_ref().is_none_or(|check| check(value))
    }
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parameter")
            .field("name", &self.name)
            .field("presence", &self.presence)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

/// A chat command, possibly with nested subcommands.
#[derive(Clone)]
pub struct Command {
    name: String,
    description: String,
    params: Vec<Parameter>,
    handler: CommandHandler,
    subcommands: Vec<Command>,
    requires_elevated: bool,
    allow_rest: bool,
}

impl Command {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        handler: impl Fn(&CommandArgs) -> HandlerResult + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            params: Vec::new(),
            handler: Arc::new(handler),
            subcommands: Vec::new(),
            requires_elevated: false,
            allow_rest: false,
        }
    }

    /// Command whose handler also receives `module`.
    pub fn for_module<M>(
        name: impl Into<String>,
        description: impl Into<String>,
        module: Arc<M>,
        handler: impl Fn(&M, &CommandArgs) -> HandlerResult + Send + Sync + 'static,
    ) -> Self
    where
        M: Module + ?Sized + 'static,
    {
        Self::new(name, description, move |args| handler(&*module, args))
    }

    pub fn param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    pub fn subcommand(mut self, sub: Command) -> Self {
        self.subcommands.push(sub);
        self
    }

    /// Only broadcasters and moderators may run this command.
    pub fn elevated(mut self) -> Self {
        self.requires_elevated = true;
        self
    }

    /// Collect arguments beyond the declared parameters instead of failing.
    pub fn allow_rest(mut self) -> Self {
        self.allow_rest = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    pub fn subcommands(&self) -> &[Command] {
        &self.subcommands
    }

    pub fn requires_elevated(&self) -> bool {
        self.requires_elevated
    }

    pub fn allows_rest(&self) -> bool {
        self.allow_rest
    }

    /// Subcommand whose name is exactly `token`.
    pub fn find_subcommand(&self, token: &str) -> Option<&Command> {
        self.subcommands.iter().find(|sub| sub.name == token)
    }

    pub(crate) fn invoke(&self, args: &CommandArgs) -> HandlerResult {
        (self.handler)(args)
    }

    /// One-line usage, e.g. `points add <user> [amount=1] [...]`.
    pub fn usage(&self) -> String {
        let mut usage = self.name.clone();
        for p in &self.params {
            let part = match p.presence() {
                Presence::Required => format!(" <{}>", p.name()),
                Presence::Optional => format!(" [{}]", p.name()),
                Presence::Default(v) => format!(" [{}={}]", p.name(), v),
            };
            usage.push_str(&part);
        }
        if self.allow_rest {
            usage.push_str(" [...]");
        }
        usage
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("subcommands", &self.subcommands)
            .field("requires_elevated", &self.requires_elevated)
            .field("allow_rest", &self.allow_rest)
            .finish_non_exhaustive()
    }
}

/// Bound view of an invocation, built fresh for each handler call.
#[derive(Debug, Clone)]
pub struct CommandArgs {
    /// Resolved command path, e.g. `points add`.
    pub command: String,
    pub parameters: HashMap<String, String>,
    /// Arguments beyond the declared parameters, in order.
    pub rest: Vec<String>,
    pub channel: String,
    pub sender: String,
    pub message_id: String,
    /// Parent id of the invoking message, if it was itself a reply.
    pub parent_id: Option<String>,
    pub roles: Roles,
    /// Caller is broadcaster or moderator.
    pub elevated: bool,
    pub(crate) outbox: Outbox,
}

impl CommandArgs {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }

    /// Handle for sending messages beyond the returned one.
    pub fn outbox(&self) -> &Outbox {
        &self.outbox
    }
}
