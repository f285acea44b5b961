//! Command registry.
//!
//! Maps lower-cased command names to their definitions. Registration
//! normally happens once before the inbound loop starts, but is guarded by
//! a read-mostly lock so commands may also be added at runtime. Lookups
//! clone an `Arc` out and release the lock before any handler runs.

use super::command::Command;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Registry of top-level commands.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: RwLock<HashMap<String, Arc<Command>>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a command; an existing command with the same name is replaced.
    pub fn register(&self, command: Command) {
        let key = command.name().to_lowercase();
        let replaced = self
            .commands
            .write()
            .insert(key.clone(), Arc::new(command))
            .is_some();
        debug!(command = %key, replaced, "command registered");
    }

    /// Case-insensitive lookup.
    pub fn lookup(&self, name: &str) -> Option<Arc<Command>> {
        self.commands.read().get(&name.to_lowercase()).cloned()
    }

    /// All top-level commands, ordered by name.
    pub fn list(&self) -> Vec<Arc<Command>> {
        let mut commands: Vec<_> = self.commands.read().values().cloned().collect();
        commands.sort_by(|a, b| a.name().to_lowercase().cmp(&b.name().to_lowercase()));
        commands
    }

    pub fn len(&self) -> usize {
        self.commands.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.read().is_empty()
    }
}
