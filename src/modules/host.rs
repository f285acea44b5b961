//! Module event loop and fan-in.
//!
//! Each registered module with an external trigger gets its own listener
//! task, running until the host shuts down. Message triggers are evaluated
//! inline, in registration order, for every inbound message. All paths
//! feed the same outbox.
//!
//! Handler failures and panics are logged and turn into "no message"; they
//! never stop a listener or the inbound loop.

use super::{Module, ModuleArgs, TriggerStream};
use crate::error::panic_reason;
use crate::message::{IncomingMessage, OutgoingMessage};
use crate::outbox::Outbox;
use crate::telemetry::{HandlerTimer, spans};
use futures_util::{FutureExt, StreamExt};
use parking_lot::{Mutex, RwLock};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, error, info};

/// Owns registered modules and their listener tasks.
pub struct ModuleHost {
    modules: RwLock<Vec<Arc<dyn Module>>>,
    listeners: Mutex<Vec<JoinHandle<()>>>,
    outbox: Outbox,
    shutdown: CancellationToken,
}

impl ModuleHost {
    /// Listeners stop when `shutdown` (or [`ModuleHost::shutdown`]) fires.
    pub fn new(outbox: Outbox, shutdown: CancellationToken) -> Self {
        Self {
            modules: RwLock::new(Vec::new()),
            listeners: Mutex::new(Vec::new()),
            outbox,
            shutdown,
        }
    }

    /// Register a module and start listening to its external trigger.
    ///
    /// Must be called from within a tokio runtime.
    pub fn register(&self, module: Arc<dyn Module>) {
        if let Some(source) = module.external_trigger() {
            let span = spans::module(module.name());
            let handle = tokio::spawn(
                listen(
                    module.clone(),
                    source,
                    self.outbox.clone(),
                    self.shutdown.child_token(),
                )
                .instrument(span),
            );
            self.listeners.lock().push(handle);
        }
        info!(module = %module.name(), "module registered");
        self.modules.write().push(module);
    }

    /// Evaluate every module's message trigger against `incoming`.
    pub async fn on_message(&self, incoming: &IncomingMessage) {
        let modules = self.modules.read().clone();
        for module in modules {
            let Some(args) = module.message_trigger(incoming) else {
                continue;
            };
            let span = spans::module(module.name());
            async {
                let fallback = if args.channel.is_empty() {
                    incoming.channel.clone()
                } else {
                    args.channel.clone()
                };
                if let Some(out) = run_handler(module.as_ref(), args).await {
                    let mut out = fill_channel(out, &fallback);
                    if out.send_as_reply
                        && out.parent_id.is_none()
                        && !incoming.message_id.is_empty()
                    {
                        out.parent_id = Some(incoming.message_id.clone());
                    }
                    self.outbox.send(out).await;
                }
            }
            .instrument(span)
            .await;
        }
    }

    pub fn len(&self) -> usize {
        self.modules.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.read().is_empty()
    }

    /// Stop every listener and wait for them to finish.
    pub async fn shutdown(&self) {
        self.shutdown.cancel();
        let handles = std::mem::take(&mut *self.listeners.lock());
        for handle in handles {
            if let Err(e) = handle.await {
                error!(error = %e, "module listener ended abnormally");
            }
        }
    }
}

async fn listen(
    module: Arc<dyn Module>,
    mut source: TriggerStream,
    outbox: Outbox,
    shutdown: CancellationToken,
) {
    debug!("module listener started");
    loop {
        let args = tokio::select! {
            _ = shutdown.cancelled() => break,
            next = source.next() => match next {
                Some(args) => args,
                None => {
                    debug!("trigger source ended");
                    break;
                }
            },
        };

        let channel = args.channel.clone();
        let out = tokio::select! {
            _ = shutdown.cancelled() => {
                debug!("handler abandoned on shutdown");
                break;
            }
            out = run_handler(module.as_ref(), args) => out,
        };
        if let Some(out) = out {
            outbox.send(fill_channel(out, &channel)).await;
        }
    }
    debug!("module listener stopped");
}

async fn run_handler(module: &dyn Module, args: ModuleArgs) -> Option<OutgoingMessage> {
    let _timer = HandlerTimer::new("module", module.name());
    match AssertUnwindSafe(module.handle(args)).catch_unwind().await {
        Ok(Ok(out)) => out,
        Ok(Err(e)) => {
            error!(module = %module.name(), error = %e, "module handler failed");
            None
        }
        Err(payload) => {
            error!(
                module = %module.name(),
                reason = %panic_reason(payload.as_ref()),
                "module handler panicked"
            );
            None
        }
    }
}

fn fill_channel(mut out: OutgoingMessage, channel: &str) -> OutgoingMessage {
    if out.channel.is_empty() {
        out.channel = channel.to_string();
    }
    out
}
