//! Shared send path.
//!
//! Every producer (command dispatch, module listeners, message triggers)
//! holds a cloned [`Outbox`]. Messages go through one bounded queue that a
//! single writer task drains into the transport, so frames are never
//! interleaved on the wire.
//!
//! Sending is fire-and-forget: a full or closed queue is logged and the
//! message dropped. Callers never observe delivery.

use crate::message::OutgoingMessage;
use crate::transport::MessageSink;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

/// Default time a producer waits on a full queue before dropping.
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// Cloneable handle onto the outbound queue.
#[derive(Debug, Clone)]
pub struct Outbox {
    tx: mpsc::Sender<OutgoingMessage>,
    send_timeout: Duration,
}

impl Outbox {
    /// Create a queue holding up to `capacity` pending messages.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<OutgoingMessage>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (
            Self {
                tx,
                send_timeout: DEFAULT_SEND_TIMEOUT,
            },
            rx,
        )
    }

    pub fn with_send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = timeout;
        self
    }

    /// Queue a message, waiting up to the send timeout for room.
    pub async fn send(&self, msg: OutgoingMessage) {
        if !is_sendable(&msg) {
            return;
        }
        match tokio::time::timeout(self.send_timeout, self.tx.send(msg)).await {
            Ok(Ok(())) => {}
            Ok(Err(mpsc::error::SendError(msg))) => {
                debug!(channel = %msg.channel, "outbox closed, message dropped");
            }
            Err(_timeout) => {
                warn!(
                    "outbox full: writer not draining (timeout after {:?}), message dropped",
                    self.send_timeout
                );
            }
        }
    }

    /// Queue a message without waiting; usable from synchronous handlers.
    pub fn try_send(&self, msg: OutgoingMessage) {
        if !is_sendable(&msg) {
            return;
        }
        match self.tx.try_send(msg) {
            Ok(()) => {}
            Err(TrySendError::Full(msg)) => {
                warn!(channel = %msg.channel, "outbox full, message dropped");
            }
            Err(TrySendError::Closed(msg)) => {
                debug!(channel = %msg.channel, "outbox closed, message dropped");
            }
        }
    }

    /// Whether the writer side has gone away.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

fn is_sendable(msg: &OutgoingMessage) -> bool {
    if msg.text.trim().is_empty() {
        debug!(channel = %msg.channel, "dropping empty outgoing message");
        return false;
    }
    if msg.channel.is_empty() {
        warn!(text = %msg.text, "dropping outgoing message without channel");
        return false;
    }
    true
}

/// Drain the queue into `sink` until cancelled or every handle is dropped.
///
/// This is the only place messages reach the transport.
pub async fn run_writer<S>(
    mut rx: mpsc::Receiver<OutgoingMessage>,
    sink: S,
    shutdown: CancellationToken,
) where
    S: MessageSink,
{
    loop {
        let msg = tokio::select! {
            _ = shutdown.cancelled() => break,
            next = rx.recv() => match next {
                Some(msg) => msg,
                None => break,
            },
        };

        debug!(
            channel = %msg.channel,
            reply_parent = msg.reply_parent(),
            "message send"
        );
        if let Err(e) = sink.deliver(&msg).await {
            warn!(channel = %msg.channel, error = %e, "failed to deliver message");
        }
    }
    debug!("outbox writer stopped");
}

/// Give a writer up to `timeout` to flush what is queued once every
/// [`Outbox`] handle is gone, then cancel `stop`.
///
/// `stop` should be the writer's own token, not one shared with producers,
/// or the queue is abandoned as soon as they shut down. Returns whether the
/// writer finished on its own.
pub async fn finish_writer(
    mut writer: JoinHandle<()>,
    stop: &CancellationToken,
    timeout: Duration,
) -> bool {
    match tokio::time::timeout(timeout, &mut writer).await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            error!(error = %e, "outbox writer failed");
            false
        }
        Err(_) => {
            warn!("outbox writer did not drain in time ({:?})", timeout);
            stop.cancel();
            false
        }
    }
}
