//! Console transport: stdin lines in, formatted lines out.

use super::MessageSink;
use crate::config::ConsoleConfig;
use crate::error::TransportError;
use crate::message::{IncomingMessage, OutgoingMessage};
use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

/// Writes each outgoing message as one line.
pub struct ConsoleSink<W> {
    out: Mutex<W>,
}

impl ConsoleSink<tokio::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

impl<W> ConsoleSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

#[async_trait]
impl<W> MessageSink for ConsoleSink<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    async fn deliver(&self, msg: &OutgoingMessage) -> Result<(), TransportError> {
        let mut line = format_outgoing(msg);
        line.push('\n');
        let mut out = self.out.lock().await;
        out.write_all(line.as_bytes()).await?;
        out.flush().await?;
        Ok(())
    }
}

/// Render an outgoing message for display.
pub fn format_outgoing(msg: &OutgoingMessage) -> String {
    match msg.reply_parent() {
        Some(parent) => format!("#{} [reply:{}] {}", msg.channel, parent, msg.text),
        None => format!("#{} {}", msg.channel, msg.text),
    }
}

/// Build the inbound message for one console line.
///
/// Blank lines are skipped.
pub fn console_message(line: &str, identity: &ConsoleConfig) -> Option<IncomingMessage> {
    let text = line.trim_end_matches(['\r', '\n']);
    if text.trim().is_empty() {
        return None;
    }
    Some(
        IncomingMessage::new(&identity.channel, &identity.sender, text)
            .with_id(Uuid::new_v4().to_string())
            .with_roles(identity.roles()),
    )
}

/// Feed lines from `reader` into the inbound queue until EOF or shutdown.
pub async fn read_console<R>(
    reader: R,
    identity: ConsoleConfig,
    inbound: mpsc::Sender<IncomingMessage>,
    shutdown: CancellationToken,
) where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        let line = tokio::select! {
            _ = shutdown.cancelled() => break,
            line = lines.next_line() => line,
        };
        match line {
            Ok(Some(line)) => {
                let Some(msg) = console_message(&line, &identity) else {
                    continue;
                };
                if inbound.send(msg).await.is_err() {
                    debug!("inbound queue closed, console reader stopping");
                    break;
                }
            }
            Ok(None) => {
                debug!("console input closed");
                break;
            }
            Err(e) => {
                warn!(error = %e, "failed to read console input");
                break;
            }
        }
    }
}
