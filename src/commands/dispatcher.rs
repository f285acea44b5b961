//! Command dispatch.
//!
//! One call per detected command: resolve the command, gate on role,
//! descend into subcommands, bind arguments, run the handler, then address
//! the reply to the invoking channel before it reaches the outbox.
//!
//! Every failure ends the invocation. Failures are logged; whether the
//! user ever hears about them is decided by [`ErrorReplyPolicy`], which
//! defaults to silence so that typos never produce bot noise.

use super::binder::bind;
use super::command::{Command, CommandArgs};
use super::registry::CommandRegistry;
use crate::error::{DispatchError, panic_reason};
use crate::message::{IncomingCommand, IncomingMessage, OutgoingMessage};
use crate::outbox::Outbox;
use crate::telemetry::{HandlerTimer, spans};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use tracing::{Instrument, error, info, warn};

/// What the chat sees when an invocation fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorReplyPolicy {
    /// Failures are only logged.
    #[default]
    Silent,
    /// User errors are also answered with a threaded reply.
    Notify,
}

/// Resolves and runs commands against a registry.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<CommandRegistry>,
    outbox: Outbox,
    policy: ErrorReplyPolicy,
}

impl Dispatcher {
    pub fn new(registry: Arc<CommandRegistry>, outbox: Outbox) -> Self {
        Self {
            registry,
            outbox,
            policy: ErrorReplyPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ErrorReplyPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn registry(&self) -> &Arc<CommandRegistry> {
        &self.registry
    }

    pub fn policy(&self) -> ErrorReplyPolicy {
        self.policy
    }

    /// Dispatch one invocation and send its reply.
    ///
    /// Failures have already been logged (and answered, per policy) when
    /// this returns; the error is handed back for callers that care.
    pub async fn dispatch(&self, incoming: &IncomingCommand) -> Result<(), DispatchError> {
        let span = spans::command(
            &incoming.name,
            &incoming.message.channel,
            &incoming.message.sender,
        );
        async {
            match self.execute(incoming) {
                Ok(Some(out)) => {
                    self.outbox.send(out).await;
                    Ok(())
                }
                Ok(None) => Ok(()),
                Err(e) => {
                    self.report(&incoming.message, &e).await;
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Resolve, bind and run the handler without sending anything.
    ///
    /// A returned message is already addressed to the invoking channel and
    /// stamped with the invoking message id when it asks to be a reply.
    pub fn execute(
        &self,
        incoming: &IncomingCommand,
    ) -> Result<Option<OutgoingMessage>, DispatchError> {
        let root = self
            .registry
            .lookup(&incoming.name)
            .ok_or_else(|| DispatchError::UnknownCommand(incoming.name.clone()))?;

        let (command, path, remaining) = self.resolve(&root, incoming)?;
        let bound = bind(command, &path, remaining)?;

        let message = &incoming.message;
        let args = CommandArgs {
            command: path.clone(),
            parameters: bound.parameters,
            rest: bound.rest,
            channel: message.channel.clone(),
            sender: message.sender.clone(),
            message_id: message.message_id.clone(),
            parent_id: message.parent_id.clone(),
            roles: message.roles,
            elevated: message.roles.is_elevated(),
            outbox: self.outbox.clone(),
        };

        let outcome = {
            let _timer = HandlerTimer::new("command", &path);
            catch_unwind(AssertUnwindSafe(|| command.invoke(&args)))
        };
        let out = match outcome {
            Ok(Ok(out)) => out,
            Ok(Err(e)) => {
                return Err(DispatchError::HandlerFailed {
                    command: path,
                    reason: e.to_string(),
                });
            }
            Err(payload) => {
                return Err(DispatchError::HandlerFailed {
                    command: path,
                    reason: panic_reason(payload.as_ref()),
                });
            }
        };

        Ok(out.map(|out| address_reply(out, message)))
    }

    /// Walk the subcommand tree, checking roles at every level.
    fn resolve<'c, 'i>(
        &self,
        root: &'c Command,
        incoming: &'i IncomingCommand,
    ) -> Result<(&'c Command, String, &'i [String]), DispatchError> {
        let elevated = incoming.message.roles.is_elevated();
        let mut current = root;
        let mut path = root.name().to_string();
        let mut remaining = incoming.args.as_slice();

        check_role(current, &path, elevated)?;
        while let Some((token, rest)) = remaining.split_first() {
            let Some(sub) = current.find_subcommand(token) else {
                break;
            };
            current = sub;
            path.push(' ');
            path.push_str(sub.name());
            remaining = rest;
            check_role(current, &path, elevated)?;
        }

        Ok((current, path, remaining))
    }

    /// Log a failure and, when the policy allows, tell the user.
    pub async fn report(&self, message: &IncomingMessage, err: &DispatchError) {
        let code = err.error_code();
        match err {
            DispatchError::UnknownCommand(_)
            | DispatchError::PermissionDenied(_)
            | DispatchError::EmptyCommandInput => {
                info!(error = %err, error_code = code, "command rejected");
            }
            DispatchError::TooManyArguments { .. }
            | DispatchError::MissingRequiredParameter { .. }
            | DispatchError::InvalidParameterValue { .. } => {
                warn!(error = %err, error_code = code, "command arguments rejected");
            }
            DispatchError::HandlerFailed { .. } => {
                error!(error = %err, error_code = code, "command handler failed");
            }
        }

        if self.policy == ErrorReplyPolicy::Notify && err.is_user_error() {
            let notice = address_reply(OutgoingMessage::reply(err.to_string()), message);
            self.outbox.send(notice).await;
        }
    }
}

fn check_role(command: &Command, path: &str, elevated: bool) -> Result<(), DispatchError> {
    if command.requires_elevated() && !elevated {
        return Err(DispatchError::PermissionDenied(path.to_string()));
    }
    Ok(())
}

/// Force the destination to the invoking channel and stamp reply threading.
fn address_reply(mut out: OutgoingMessage, incoming: &IncomingMessage) -> OutgoingMessage {
    out.channel = incoming.channel.clone();
    if out.send_as_reply {
        out.parent_id = Some(incoming.message_id.clone()).filter(|id| !id.is_empty());
    }
    out
}
