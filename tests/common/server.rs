//! Test bot management.
//!
//! Runs a [`Bot`] in-process with its inbound loop and outbox writer on
//! their own tasks, capturing everything it sends.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tmi_bot::config::Config;
use tmi_bot::outbox::{self, Outbox};
use tmi_bot::transport::MessageSink;
use tmi_bot::{Bot, IncomingMessage, OutgoingMessage, TransportError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

/// Forwards delivered messages to the test.
struct ChannelSink(mpsc::UnboundedSender<OutgoingMessage>);

#[async_trait]
impl MessageSink for ChannelSink {
    async fn deliver(&self, msg: &OutgoingMessage) -> Result<(), TransportError> {
        self.0.send(msg.clone()).map_err(|_| TransportError::Closed)
    }
}

/// A running test bot.
pub struct TestBot {
    pub bot: Arc<Bot>,
    inbound: mpsc::Sender<IncomingMessage>,
    sent: mpsc::UnboundedReceiver<OutgoingMessage>,
    shutdown: CancellationToken,
    run: Option<JoinHandle<()>>,
}

impl TestBot {
    /// Spawn a bot configured from a TOML snippet.
    #[allow(dead_code)]
    pub async fn spawn(config: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(config)?;
        tmi_bot::config::validate(&config)
            .map_err(|errors| anyhow::anyhow!("invalid test config: {errors:?}"))?;
        Self::spawn_with(|outbox, shutdown| Bot::from_config(&config, outbox, shutdown)).await
    }

    /// Spawn a bot built by `build`.
    #[allow(dead_code)]
    pub async fn spawn_with<F, E>(build: F) -> anyhow::Result<Self>
    where
        F: FnOnce(Outbox, CancellationToken) -> Result<Bot, E>,
        E: std::error::Error + Send + Sync + 'static,
    {
        let shutdown = CancellationToken::new();
        let (outbox, outgoing_rx) = Outbox::channel(64);
        let (sent_tx, sent) = mpsc::unbounded_channel();
        tokio::spawn(outbox::run_writer(
            outgoing_rx,
            ChannelSink(sent_tx),
            shutdown.clone(),
        ));

        let bot = Arc::new(build(outbox, shutdown.clone())?);
        let (inbound, inbound_rx) = mpsc::channel(64);
        let run = {
            let bot = Arc::clone(&bot);
            tokio::spawn(async move { bot.run(inbound_rx).await })
        };

        Ok(Self {
            bot,
            inbound,
            sent,
            shutdown,
            run: Some(run),
        })
    }

    /// Create a chat participant in `channel`.
    pub fn client(&self, channel: &str, sender: &str) -> super::client::TestClient {
        super::client::TestClient::new(self.inbound.clone(), channel, sender)
    }

    /// Receive the next outgoing message.
    pub async fn recv(&mut self) -> anyhow::Result<OutgoingMessage> {
        self.recv_timeout(Duration::from_secs(5)).await
    }

    /// Receive the next outgoing message, waiting at most `dur`.
    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<OutgoingMessage> {
        timeout(dur, self.sent.recv())
            .await?
            .ok_or_else(|| anyhow::anyhow!("writer stopped"))
    }

    /// Receive messages until the given predicate returns true.
    #[allow(dead_code)]
    pub async fn recv_until<F>(&mut self, mut predicate: F) -> anyhow::Result<Vec<OutgoingMessage>>
    where
        F: FnMut(&OutgoingMessage) -> bool,
    {
        let mut messages = Vec::new();
        loop {
            let msg = self.recv().await?;
            let done = predicate(&msg);
            messages.push(msg);
            if done {
                break;
            }
        }
        Ok(messages)
    }

    /// Assert nothing is sent within `dur`.
    #[allow(dead_code)]
    pub async fn expect_silence(&mut self, dur: Duration) {
        if let Ok(msg) = self.recv_timeout(dur).await {
            panic!("unexpected message: {msg:?}");
        }
    }

    /// Cancel the bot and wait for its inbound loop to finish.
    #[allow(dead_code)]
    pub async fn shutdown(&mut self) -> anyhow::Result<()> {
        self.shutdown.cancel();
        if let Some(run) = self.run.take() {
            timeout(Duration::from_secs(5), run).await??;
        }
        Ok(())
    }
}

impl Drop for TestBot {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
