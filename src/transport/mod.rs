//! Transport boundary.
//!
//! The wire protocol lives outside this crate. A transport feeds decoded
//! [`IncomingMessage`](crate::message::IncomingMessage) values into the
//! bot's inbound queue and implements [`MessageSink`] for the outbox
//! writer. The console transport is provided for local use.

pub mod console;

use crate::error::TransportError;
use crate::message::OutgoingMessage;
use async_trait::async_trait;

pub use console::{ConsoleSink, read_console};

/// Destination for outgoing messages.
///
/// Called from the single outbox writer task, one message at a time.
#[async_trait]
pub trait MessageSink: Send + Sync + 'static {
    async fn deliver(&self, msg: &OutgoingMessage) -> Result<(), TransportError>;
}
