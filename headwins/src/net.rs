//! Networking layer for client-server communication.
//!
//! Frames are JSON text over a single WebSocket. Every frame carries a
//! top-level `type` discriminator.

/// JSON encoding of outbound messages and decoding of inbound frames.
pub mod codec;

/// The single duplex connection to the poker server.
pub mod connection;

/// Error types for the codec and the connection.
pub mod errors;

/// Message types for the client-server protocol.
pub mod messages;
