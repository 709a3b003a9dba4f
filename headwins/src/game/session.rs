//! The client's locally owned view of the table.
//!
//! A [`Session`] holds three independently updated slices:
//!
//! - the latest authoritative [`SharedGameState`], replaced wholesale on
//!   every `game_state_update`
//! - the player's private hand, which the server only sends to this client
//! - the table log
//!
//! [`Session::apply`] is the only way inbound events change the session,
//! and a snapshot update never touches the hand or the log.

use chrono::{DateTime, Utc};
use std::fmt;

use super::{
    actions::{self, ActionError, Intent},
    entities::{PlayerShared, SharedGameState, Username},
};
use crate::net::messages::{ClientMessage, NoticeKind, ServerEvent};

/// Log line appended when the connection goes away.
pub const DISCONNECTED: &str = "Disconnected";

/// Label attached to each log record so a front end can direct the
/// player's attention.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RecordKind {
    /// Dealing and other table events.
    Game,
    Chat,
    Info,
    Error,
    /// Local rejection of something the player tried to do.
    Warning,
    /// Echo of the player's own action.
    You,
    /// Frames the client couldn't interpret, shown as-is.
    Raw,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Game => "GAME",
            Self::Chat => "CHAT",
            Self::Info => "INFO",
            Self::Error => "ERROR",
            Self::Warning => "WARN",
            Self::You => "YOU",
            Self::Raw => "RAW",
        };
        write!(f, "{repr}")
    }
}

impl From<NoticeKind> for RecordKind {
    fn from(kind: NoticeKind) -> Self {
        match kind {
            NoticeKind::Chat => Self::Chat,
            NoticeKind::System | NoticeKind::Info => Self::Info,
            NoticeKind::Error => Self::Error,
        }
    }
}

/// A timestamped log line.
#[derive(Clone, Debug)]
pub struct LogRecord {
    pub datetime: DateTime<Utc>,
    pub kind: RecordKind,
    pub content: String,
}

impl LogRecord {
    pub fn new(kind: RecordKind, content: String) -> Self {
        Self {
            datetime: Utc::now(),
            kind,
            content,
        }
    }
}

/// Where the session is in its connect-join-sync lifecycle.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SyncPhase {
    #[default]
    Disconnected,
    /// Connected, `join` not yet sent.
    ConnectedIdle,
    /// `join` sent, no snapshot received yet.
    AwaitingState,
    /// At least one snapshot received.
    Synced,
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Disconnected => "disconnected",
            Self::ConnectedIdle => "connected",
            Self::AwaitingState => "waiting for game state",
            Self::Synced => "synced",
        };
        write!(f, "{repr}")
    }
}

/// Everything the reducer reacts to.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    /// The connection opened.
    Connected,
    /// The `join` message went out.
    Joined,
    /// The connection closed, for whatever reason.
    Disconnected,
    /// A decoded frame from the server.
    Server(ServerEvent),
}

impl From<ServerEvent> for SessionEvent {
    fn from(event: ServerEvent) -> Self {
        Self::Server(event)
    }
}

#[derive(Debug)]
pub struct Session {
    username: Username,
    phase: SyncPhase,
    state: Option<SharedGameState>,
    hand: Vec<String>,
    log: Vec<LogRecord>,
    /// Bumped every time the log is reset rather than appended to.
    log_generation: u64,
}

impl Session {
    pub fn new(username: Username) -> Self {
        Self {
            username,
            phase: SyncPhase::default(),
            state: None,
            hand: Vec::new(),
            log: Vec::new(),
            log_generation: 0,
        }
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    /// The latest snapshot, if one has arrived.
    pub fn state(&self) -> Option<&SharedGameState> {
        self.state.as_ref()
    }

    pub fn hand(&self) -> &[String] {
        &self.hand
    }

    pub fn log(&self) -> &[LogRecord] {
        &self.log
    }

    pub fn log_generation(&self) -> u64 {
        self.log_generation
    }

    /// This client's seat in the latest snapshot.
    pub fn me(&self) -> Option<&PlayerShared> {
        self.state.as_ref()?.player(self.username.as_str())
    }

    /// Whether the latest snapshot hands the action to this client.
    pub fn is_my_turn(&self) -> bool {
        self.state
            .as_ref()
            .is_some_and(|state| actions::is_my_turn(state, &self.username))
    }

    /// The hand to show: empty unless this client's seat is still in the
    /// hand.
    pub fn visible_hand(&self) -> &[String] {
        match self.me() {
            Some(me) if me.is_in_hand => &self.hand,
            _ => &[],
        }
    }

    /// Fold one event into the session.
    pub fn apply(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Connected => self.phase = SyncPhase::ConnectedIdle,
            SessionEvent::Joined => {
                if self.phase == SyncPhase::ConnectedIdle {
                    self.phase = SyncPhase::AwaitingState;
                }
            }
            SessionEvent::Disconnected => {
                self.phase = SyncPhase::Disconnected;
                self.record_local(RecordKind::Error, DISCONNECTED.to_string());
            }
            SessionEvent::Server(event) => self.apply_server_event(event),
        }
    }

    fn apply_server_event(&mut self, event: ServerEvent) {
        match event {
            ServerEvent::NewRound { hand } => {
                let dealt = format!("You were dealt: {}", hand.join(", "));
                self.hand = hand;
                self.log = vec![LogRecord::new(RecordKind::Game, dealt)];
                self.log_generation += 1;
            }
            ServerEvent::GameStateUpdate(state) => {
                if state.turn_holders().count() > 1 {
                    log::warn!("snapshot gives the action to more than one seat");
                }
                self.state = Some(state);
                self.phase = SyncPhase::Synced;
            }
            ServerEvent::GetHand { hand } => self.hand = hand,
            ServerEvent::Notice { kind, message } => self.record_local(kind.into(), message),
            ServerEvent::Announcement(text) => self.record_local(RecordKind::Game, text),
            ServerEvent::Unrecognized(value) => {
                self.record_local(RecordKind::Raw, value.to_string());
            }
            ServerEvent::Malformed(raw) => self.record_local(RecordKind::Raw, raw),
        }
    }

    /// Append a locally produced line to the log.
    pub fn record_local(&mut self, kind: RecordKind, content: String) {
        self.log.push(LogRecord::new(kind, content));
    }

    /// Translate an intent against the current snapshot.
    ///
    /// Returns the message to send, or `None` after recording why nothing
    /// will be sent. A successful raise is echoed to the log with the
    /// increment as parsed, so `1e2` shows up as `100`.
    pub fn prepare(&mut self, intent: &Intent) -> Option<ClientMessage> {
        match actions::translate(self.state.as_ref(), &self.username, intent) {
            Ok(message) => {
                if let Intent::Raise(raw) = intent
                    && let Ok(amount) = actions::parse_raise_amount(raw)
                {
                    self.record_local(RecordKind::You, format!("You: Raise {amount}"));
                }
                Some(message)
            }
            Err(ActionError::EmptyChat) => None,
            Err(error) => {
                self.record_local(RecordKind::Warning, error.to_string());
                None
            }
        }
    }
}
