//! # Headwins
//!
//! Client-side connector for the Headwins poker server.
//!
//! The server is authoritative: it deals, evaluates, and moves the action
//! around the table. This library keeps a client in sync with it. It decodes
//! the server's pushed events into typed values, folds them into a locally
//! owned [`Session`], and translates the player's intents into well-formed
//! outbound messages.
//!
//! ## Core Modules
//!
//! - [`game`]: Shared table snapshot, the local session reducer, and the
//!   action translator
//! - [`net`]: Wire messages, the JSON codec, and the WebSocket connection
//!
//! ## Example
//!
//! ```
//! use headwins::{Session, codec, entities::Username};
//!
//! let mut session = Session::new(Username::new("Player 7"));
//! session.apply(codec::decode(r#"{"type":"new_round","hand":["Ah","Kd"]}"#).into());
//! assert_eq!(session.hand(), ["Ah", "Kd"]);
//! ```

/// Networking components: messages, codec, and connection management.
pub mod net;
pub use net::{
    codec,
    connection::{self, Connection},
    errors, messages,
};

/// Table state, the local session, and action translation.
pub mod game;
pub use game::{
    actions::{self, ActionError, ActionLabel, Intent},
    entities::{self, PlayerShared, SharedGameState, Usd, Username},
    session::{self, LogRecord, RecordKind, Session, SessionEvent, SyncPhase},
};
