//! Table state as the client sees it.
//!
//! This module provides:
//! - The authoritative snapshot types pushed by the server
//! - The client's own session slice (hand, log, sync phase) and its reducer
//! - Translation of player intents into outbound messages

pub mod actions;
pub mod entities;
pub mod session;
