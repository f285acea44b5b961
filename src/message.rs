//! Chat message records exchanged with the transport.
//!
//! The transport decodes wire lines into [`IncomingMessage`] values and
//! transmits [`OutgoingMessage`] values; everything in between works on
//! these types only.

use crate::commands::tokenize;
use crate::error::DispatchError;

/// Role flags carried by an inbound message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Roles {
    pub broadcaster: bool,
    pub moderator: bool,
    pub subscriber: bool,
    pub vip: bool,
}

impl Roles {
    /// Broadcaster or moderator.
    #[inline]
    pub fn is_elevated(&self) -> bool {
        self.broadcaster || self.moderator
    }
}

/// A decoded chat line, read-only once produced by the transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncomingMessage {
    /// Channel the line was sent to (without any `#` prefix).
    pub channel: String,
    pub text: String,
    /// Login of the sender.
    pub sender: String,
    /// Server-assigned message id.
    pub message_id: String,
    /// Id of the message this line replies to, if any.
    pub parent_id: Option<String>,
    pub roles: Roles,
}

impl IncomingMessage {
    pub fn new(
        channel: impl Into<String>,
        sender: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            channel: channel.into(),
            text: text.into(),
            sender: sender.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = message_id.into();
        self
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_roles(mut self, roles: Roles) -> Self {
        self.roles = roles;
        self
    }
}

/// An inbound message recognized as a command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingCommand {
    pub message: IncomingMessage,
    /// Command name exactly as typed.
    pub name: String,
    /// Argument tokens following the name.
    pub args: Vec<String>,
}

impl IncomingCommand {
    /// Detect and tokenize a command invocation.
    ///
    /// Returns `None` when the text does not start with `marker`, and
    /// `Some(Err(EmptyCommandInput))` when nothing but the marker (or
    /// blank quoting) follows it.
    pub fn parse(message: &IncomingMessage, marker: char) -> Option<Result<Self, DispatchError>> {
        let body = message.text.strip_prefix(marker)?;
        let mut tokens = tokenize(body).into_iter();
        let Some(name) = tokens.next() else {
            return Some(Err(DispatchError::EmptyCommandInput));
        };
        Some(Ok(Self {
            message: message.clone(),
            name,
            args: tokens.collect(),
        }))
    }
}

/// A message produced by a handler, handed to the send path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub channel: String,
    pub text: String,
    /// Message this one threads under when `send_as_reply` is set.
    pub parent_id: Option<String>,
    pub send_as_reply: bool,
}

impl OutgoingMessage {
    /// A plain channel message.
    pub fn say(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// A message threaded under the triggering message.
    pub fn reply(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            send_as_reply: true,
            ..Default::default()
        }
    }

    pub fn to_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }

    /// The parent id the transport should attach, if any.
    pub fn reply_parent(&self) -> Option<&str> {
        if self.send_as_reply {
            self.parent_id.as_deref().filter(|id| !id.is_empty())
        } else {
            None
        }
    }
}
