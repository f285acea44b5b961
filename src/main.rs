//! tmibot - chat bot driven from the console.
//!
//! Lines typed on stdin are delivered as chat messages from the configured
//! console identity; everything the bot sends is printed to stdout.

use std::time::Duration;
use tmi_bot::Bot;
use tmi_bot::config::Config;
use tmi_bot::outbox::{self, Outbox};
use tmi_bot::transport::{ConsoleSink, read_console};
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Inbound lines buffered between the console reader and the bot.
const INBOUND_CHANNEL_SIZE: usize = 64;

/// How long queued replies may take to flush on exit.
const WRITER_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (logs go to stderr; stdout carries chat output)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if std::env::var("TMIBOT_LOG_FORMAT").is_ok_and(|f| f == "json") {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tmibot.toml".to_string());

    let config = if std::path::Path::new(&config_path).exists() {
        Config::load_validated(&config_path).map_err(|e| {
            error!(path = %config_path, error = %e, "Failed to load config");
            e
        })?
    } else {
        warn!(path = %config_path, "Config file not found, using defaults");
        Config::default()
    };

    info!(
        nick = %config.bot.nick,
        channel = %config.console.channel,
        "Starting tmibot"
    );

    let shutdown = CancellationToken::new();

    // Single writer serializes every outgoing message. It has its own token
    // so an interrupt still lets queued replies flush.
    let writer_stop = CancellationToken::new();
    let (outbox, outgoing_rx) = Outbox::channel(config.outbox.capacity);
    let outbox = outbox.with_send_timeout(config.outbox.send_timeout());
    let writer = tokio::spawn(outbox::run_writer(
        outgoing_rx,
        ConsoleSink::stdout(),
        writer_stop.clone(),
    ));

    let bot = Bot::from_config(&config, outbox, shutdown.clone())?;

    // Console transport
    let (inbound_tx, inbound_rx) = mpsc::channel(INBOUND_CHANNEL_SIZE);
    tokio::spawn(read_console(
        BufReader::new(tokio::io::stdin()),
        config.console.clone(),
        inbound_tx,
        shutdown.clone(),
    ));

    // Ctrl-C stops everything
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Interrupt received, shutting down"),
                Err(e) => error!(error = %e, "Failed to listen for interrupt"),
            }
            shutdown.cancel();
        });
    }

    bot.run(inbound_rx).await;

    // Dropping the bot releases its outbox handles so the writer can drain.
    drop(bot);
    outbox::finish_writer(writer, &writer_stop, WRITER_DRAIN_TIMEOUT).await;

    info!("tmibot stopped");
    Ok(())
}
