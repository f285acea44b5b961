//! Integration test common infrastructure.
//!
//! Provides utilities for spawning in-process bots, creating chat
//! participants, and asserting on outgoing message flows.

pub mod client;
pub mod server;

#[allow(unused_imports)]
pub use client::TestClient;
#[allow(unused_imports)]
pub use server::TestBot;
