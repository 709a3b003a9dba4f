//! JSON codec between typed messages and WebSocket text frames.
//!
//! Decoding is total: every frame becomes some [`ServerEvent`]. A server
//! that starts sending a message kind this client doesn't know about only
//! ever produces a log line.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::{
    errors::CodecError,
    messages::{ClientMessage, NoticeKind, ServerEvent},
};
use crate::game::entities::SharedGameState;

/// Inbound kinds with a typed payload.
const KNOWN_KINDS: [&str; 7] = [
    "new_round",
    "game_state_update",
    "get_hand",
    "chat",
    "system",
    "info",
    "error",
];

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum KnownFrame {
    NewRound {
        #[serde(default, deserialize_with = "lenient_hand")]
        hand: Vec<String>,
    },
    GameStateUpdate {
        game_state: SharedGameState,
    },
    GetHand {
        #[serde(default, deserialize_with = "lenient_hand")]
        hand: Vec<String>,
    },
    Chat {
        message: String,
    },
    System {
        message: String,
    },
    Info {
        message: String,
    },
    Error {
        message: String,
    },
}

impl From<KnownFrame> for ServerEvent {
    fn from(frame: KnownFrame) -> Self {
        let notice = |kind, message| ServerEvent::Notice { kind, message };
        match frame {
            KnownFrame::NewRound { hand } => Self::NewRound { hand },
            KnownFrame::GameStateUpdate { game_state } => Self::GameStateUpdate(game_state),
            KnownFrame::GetHand { hand } => Self::GetHand { hand },
            KnownFrame::Chat { message } => notice(NoticeKind::Chat, message),
            KnownFrame::System { message } => notice(NoticeKind::System, message),
            KnownFrame::Info { message } => notice(NoticeKind::Info, message),
            KnownFrame::Error { message } => notice(NoticeKind::Error, message),
        }
    }
}

/// A hand that isn't an array (or is null) reads as an empty hand.
fn lenient_hand<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(cards) => cards
            .into_iter()
            .map(|card| match card {
                Value::String(card) => card,
                other => other.to_string(),
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// Serialize a client message into a text frame.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode(message: &ClientMessage) -> Result<String, CodecError> {
    Ok(serde_json::to_string(message)?)
}

/// Decode a text frame from the server. Never fails.
pub fn decode(raw: &str) -> ServerEvent {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(error) => {
            log::debug!("non-JSON frame ({error}): {raw}");
            return ServerEvent::Malformed(raw.to_string());
        }
    };

    let kind = match value {
        Value::String(text) => return ServerEvent::Announcement(text),
        Value::Object(ref fields) => fields
            .get("type")
            .and_then(Value::as_str)
            .map(str::to_owned),
        _ => None,
    };

    match kind {
        Some(kind) if KNOWN_KINDS.contains(&kind.as_str()) => {
            match KnownFrame::deserialize(&value) {
                Ok(frame) => frame.into(),
                Err(error) => {
                    log::debug!("bad '{kind}' payload ({error}): {raw}");
                    ServerEvent::Malformed(raw.to_string())
                }
            }
        }
        _ => ServerEvent::Unrecognized(value),
    }
}
