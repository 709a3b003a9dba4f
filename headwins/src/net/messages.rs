use serde::{Deserialize, Serialize};
use std::fmt;

use crate::game::entities::{SharedGameState, Usd, Username};

/// A message from the client to the poker server.
///
/// Serialized with a top-level `type` discriminator, e.g.
/// `{"type":"fold","username":"Player 7"}`.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Announce presence. Sent once, right after the connection opens.
    Join { username: Username },
    /// Table chat.
    Message { username: Username, text: String },
    /// Ask the server to deal a new hand.
    StartGame { username: Username },
    /// Forfeit the current hand.
    Fold { username: Username },
    /// Bring this round's commitment up to `amount` in total. Used for
    /// checks, calls, and raises alike; the server works out which it is.
    CommitMoney {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        username: Option<Username>,
        #[serde(serialize_with = "crate::game::entities::serialize_chips")]
        amount: Usd,
    },
}

impl fmt::Display for ClientMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Join { username } => write!(f, "{username} joined"),
            Self::Message { username, text } => write!(f, "{username}: {text}"),
            Self::StartGame { username } => write!(f, "{username} started the game"),
            Self::Fold { username } => write!(f, "{username} folded"),
            Self::CommitMoney {
                username: Some(username),
                amount,
            } => write!(f, "{username} committed {amount}"),
            Self::CommitMoney {
                username: None,
                amount,
            } => write!(f, "committed {amount}"),
        }
    }
}

/// Which free-text channel a notice arrived on.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Chat,
    System,
    Info,
    Error,
}

impl fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Chat => "chat",
            Self::System => "system",
            Self::Info => "info",
            Self::Error => "error",
        };
        write!(f, "{repr}")
    }
}

/// An inbound frame after decoding.
///
/// Every frame maps to exactly one variant; frames the client doesn't
/// understand land in [`ServerEvent::Unrecognized`] or
/// [`ServerEvent::Malformed`] rather than failing.
#[derive(Clone, Debug, PartialEq)]
pub enum ServerEvent {
    /// A new hand was dealt to this client.
    NewRound { hand: Vec<String> },
    /// A fresh authoritative table snapshot.
    GameStateUpdate(SharedGameState),
    /// This client's hand, resent outside of a new round.
    GetHand { hand: Vec<String> },
    /// A `chat`, `system`, `info`, or `error` line.
    Notice { kind: NoticeKind, message: String },
    /// A bare JSON string. The server broadcasts chat lines, commitments,
    /// and pot results this way.
    Announcement(String),
    /// Valid JSON with an unknown or missing `type`.
    Unrecognized(serde_json::Value),
    /// Not JSON, or a known `type` with a payload of the wrong shape. Holds
    /// the raw frame text.
    Malformed(String),
}

impl ServerEvent {
    /// The wire discriminator this event was decoded from, if any.
    pub fn kind(&self) -> Option<&str> {
        match self {
            Self::NewRound { .. } => Some("new_round"),
            Self::GameStateUpdate(_) => Some("game_state_update"),
            Self::GetHand { .. } => Some("get_hand"),
            Self::Notice { kind, .. } => Some(match kind {
                NoticeKind::Chat => "chat",
                NoticeKind::System => "system",
                NoticeKind::Info => "info",
                NoticeKind::Error => "error",
            }),
            Self::Unrecognized(value) => value.get("type").and_then(|t| t.as_str()),
            Self::Announcement(_) | Self::Malformed(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn alice() -> Username {
        Username::new("alice")
    }

    // === ClientMessage wire format ===

    #[test]
    fn test_join_wire_format() {
        let msg = ClientMessage::Join { username: alice() };
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"type": "join", "username": "alice"})
        );
    }

    #[test]
    fn test_chat_wire_format() {
        let msg = ClientMessage::Message {
            username: alice(),
            text: "gl hf".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"type": "message", "username": "alice", "text": "gl hf"})
        );
    }

    #[test]
    fn test_start_game_and_fold_wire_format() {
        let start = ClientMessage::StartGame { username: alice() };
        let fold = ClientMessage::Fold { username: alice() };
        assert_eq!(
            serde_json::to_value(&start).unwrap(),
            json!({"type": "start_game", "username": "alice"})
        );
        assert_eq!(
            serde_json::to_value(&fold).unwrap(),
            json!({"type": "fold", "username": "alice"})
        );
    }

    #[test]
    fn test_commit_money_without_username_omits_field() {
        let msg = ClientMessage::CommitMoney {
            username: None,
            amount: 50.0,
        };
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"type": "commit_money", "amount": 50})
        );
    }

    #[test]
    fn test_commit_money_with_username() {
        let msg = ClientMessage::CommitMoney {
            username: Some(alice()),
            amount: 50.0,
        };
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"type": "commit_money", "username": "alice", "amount": 50})
        );
    }

    #[test]
    fn test_commit_money_keeps_fraction() {
        let msg = ClientMessage::CommitMoney {
            username: Some(alice()),
            amount: 22.5,
        };
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"type": "commit_money", "username": "alice", "amount": 22.5})
        );
        assert_eq!(msg.to_string(), "alice committed 22.5");
    }

    // === Display ===

    #[test]
    fn test_client_message_display() {
        let msg = ClientMessage::CommitMoney {
            username: Some(alice()),
            amount: 30.0,
        };
        assert_eq!(msg.to_string(), "alice committed 30");
        assert_eq!(
            ClientMessage::Fold { username: alice() }.to_string(),
            "alice folded"
        );
    }

    #[test]
    fn test_server_event_kind() {
        let event = ServerEvent::Notice {
            kind: NoticeKind::Info,
            message: "hi".to_string(),
        };
        assert_eq!(event.kind(), Some("info"));
        assert_eq!(
            ServerEvent::Unrecognized(json!({"type": "ping"})).kind(),
            Some("ping")
        );
        assert_eq!(ServerEvent::Malformed("{".to_string()).kind(), None);
    }
}
