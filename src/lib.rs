//! tmi-bot - command and module framework for chat bots.
//!
//! Inbound chat lines arrive as [`IncomingMessage`]s. Lines starting with
//! the command marker are tokenized and dispatched to registered
//! [`Command`]s; every line is also offered to each registered [`Module`],
//! which may additionally react to its own timers and signals. All replies
//! leave through one [`Outbox`].

pub mod bot;
pub mod commands;
pub mod config;
pub mod error;
pub mod message;
pub mod modules;
pub mod outbox;
pub mod telemetry;
pub mod transport;

pub use bot::Bot;
pub use commands::{Command, CommandArgs, ErrorReplyPolicy, HandlerResult, Parameter};
pub use config::Config;
pub use error::{DispatchError, HandlerError, TransportError};
pub use message::{IncomingCommand, IncomingMessage, OutgoingMessage, Roles};
pub use modules::{Module, ModuleArgs};
pub use outbox::Outbox;
