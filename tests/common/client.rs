//! Test chat participant.
//!
//! Feeds chat lines into a test bot's inbound queue as one sender in one
//! channel.

use std::sync::atomic::{AtomicU64, Ordering};
use tmi_bot::{IncomingMessage, Roles};
use tokio::sync::mpsc;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// A chat participant.
pub struct TestClient {
    inbound: mpsc::Sender<IncomingMessage>,
    channel: String,
    sender: String,
    roles: Roles,
}

impl TestClient {
    pub fn new(inbound: mpsc::Sender<IncomingMessage>, channel: &str, sender: &str) -> Self {
        Self {
            inbound,
            channel: channel.to_string(),
            sender: sender.to_string(),
            roles: Roles::default(),
        }
    }

    /// Speak as a moderator from now on.
    #[allow(dead_code)]
    pub fn moderator(mut self) -> Self {
        self.roles.moderator = true;
        self
    }

    /// Build the message this client would send for `text`.
    pub fn message(&self, text: &str) -> IncomingMessage {
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        IncomingMessage::new(&self.channel, &self.sender, text)
            .with_id(format!("msg-{id}"))
            .with_roles(self.roles)
    }

    /// Send a chat line, returning its message id.
    pub async fn say(&self, text: &str) -> anyhow::Result<String> {
        let msg = self.message(text);
        let id = msg.message_id.clone();
        self.send(msg).await?;
        Ok(id)
    }

    /// Send a prepared message.
    #[allow(dead_code)]
    pub async fn send(&self, msg: IncomingMessage) -> anyhow::Result<()> {
        self.inbound
            .send(msg)
            .await
            .map_err(|_| anyhow::anyhow!("bot inbound queue closed"))
    }
}
