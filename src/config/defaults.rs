//! Default value functions for configuration.

// =============================================================================
// Bot Defaults
// =============================================================================

pub fn default_nick() -> String {
    "tmibot".to_string()
}

pub fn default_command_marker() -> char {
    '!'
}

// =============================================================================
// Outbox Defaults
// =============================================================================

pub fn default_outbox_capacity() -> usize {
    256
}

pub fn default_send_timeout_ms() -> u64 {
    5000
}

// =============================================================================
// Console Defaults
// =============================================================================

pub fn default_console_channel() -> String {
    "console".to_string()
}

pub fn default_console_sender() -> String {
    "operator".to_string()
}

/// Returns `true` (for serde defaults).
pub fn default_true() -> bool {
    true
}

// =============================================================================
// Module Defaults
// =============================================================================

pub fn default_every() -> u64 {
    1
}
