//! Telemetry utilities for handler timing and span construction.

use std::time::Instant;
use tracing::debug;

/// Guard for timing a handler call.
///
/// Logs the elapsed time when dropped.
pub struct HandlerTimer {
    kind: &'static str,
    name: String,
    start: Instant,
}

impl HandlerTimer {
    /// Start timing a handler of the given kind (`command` or `module`).
    pub fn new(kind: &'static str, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            start: Instant::now(),
        }
    }
}

impl Drop for HandlerTimer {
    fn drop(&mut self) {
        let micros = self.start.elapsed().as_micros() as u64;
        debug!(kind = self.kind, name = %self.name, elapsed_us = micros, "handler finished");
    }
}

/// Standardized span constructors.
pub mod spans {
    use tracing::{Span, info_span};

    /// Create a span for one command dispatch.
    pub fn command(name: &str, channel: &str, sender: &str) -> Span {
        info_span!("command", name = %name, channel = %channel, sender = %sender)
    }

    /// Create a span for a module listener or trigger evaluation.
    pub fn module(name: &str) -> Span {
        info_span!("module", name = %name)
    }
}
