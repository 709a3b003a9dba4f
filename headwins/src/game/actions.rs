//! Translation of player intents into outbound messages.
//!
//! Everything here is a pure function of the latest snapshot and the local
//! identity. Whose turn it is comes entirely from the server's
//! `your_turn` flags; the client never tracks turns on its own.

use std::fmt;
use thiserror::Error;

use super::entities::{PlayerShared, SharedGameState, Usd, Username};
use crate::net::messages::ClientMessage;

/// Something the player asked to do.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Intent {
    Fold,
    /// Check when already matched, call otherwise.
    CheckOrCall,
    /// Raise by the amount the player typed, on top of what they've
    /// already put in this round.
    Raise(String),
    Chat(String),
    StartGame,
}

/// Why an intent produced no message.
#[derive(Debug, Eq, PartialEq, Error)]
pub enum ActionError {
    #[error("Waiting for game state")]
    NoState,
    #[error("You don't have a seat at this table")]
    NotSeated,
    #[error("It's not your turn")]
    NotYourTurn,
    #[error("Enter a valid positive raise amount")]
    InvalidRaiseAmount(String),
    #[error("Nothing to say")]
    EmptyChat,
}

/// Label for the check-or-call control.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ActionLabel {
    Check,
    Call,
}

impl fmt::Display for ActionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Check => "Check",
            Self::Call => "Call",
        };
        write!(f, "{repr}")
    }
}

/// Whether `username` holds the action in `state`.
pub fn is_my_turn(state: &SharedGameState, username: &Username) -> bool {
    state
        .player(username.as_str())
        .is_some_and(|me| me.your_turn)
}

/// "Check" once the seat has matched the current bet, "Call" while it's
/// still short. A seat that has put in more than the threshold (the bettor
/// itself) also checks.
pub fn call_label(state: &SharedGameState, me: &PlayerShared) -> ActionLabel {
    if me.money_commited_this_round >= state.threshold {
        ActionLabel::Check
    } else {
        ActionLabel::Call
    }
}

/// Parse a user-entered raise increment.
///
/// Accepts anything that reads as a finite, strictly positive number.
/// Fractions are fine; the server works in plain numbers.
///
/// # Errors
///
/// Returns [`ActionError::InvalidRaiseAmount`] otherwise.
pub fn parse_raise_amount(raw: &str) -> Result<Usd, ActionError> {
    let amount: Usd = raw
        .trim()
        .parse()
        .map_err(|_| ActionError::InvalidRaiseAmount(raw.to_string()))?;
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ActionError::InvalidRaiseAmount(raw.to_string()));
    }
    Ok(amount)
}

fn my_seat<'a>(
    state: Option<&'a SharedGameState>,
    username: &Username,
) -> Result<(&'a SharedGameState, &'a PlayerShared), ActionError> {
    let state = state.ok_or(ActionError::NoState)?;
    let me = state
        .player(username.as_str())
        .ok_or(ActionError::NotSeated)?;
    if !me.your_turn {
        return Err(ActionError::NotYourTurn);
    }
    Ok((state, me))
}

/// Turn an intent into the message to send.
///
/// Fold, check-or-call, and raise require the snapshot to hand this client
/// the action. Chat and start are always allowed.
///
/// # Errors
///
/// Returns an [`ActionError`] describing why nothing should be sent.
pub fn translate(
    state: Option<&SharedGameState>,
    username: &Username,
    intent: &Intent,
) -> Result<ClientMessage, ActionError> {
    match intent {
        Intent::Chat(text) => {
            if text.trim().is_empty() {
                return Err(ActionError::EmptyChat);
            }
            Ok(ClientMessage::Message {
                username: username.clone(),
                text: text.clone(),
            })
        }
        Intent::StartGame => Ok(ClientMessage::StartGame {
            username: username.clone(),
        }),
        Intent::Fold => {
            my_seat(state, username)?;
            Ok(ClientMessage::Fold {
                username: username.clone(),
            })
        }
        Intent::CheckOrCall => {
            let (state, _) = my_seat(state, username)?;
            // The server turns a commitment equal to what's already in into
            // a check, and anything more into a call.
            Ok(ClientMessage::CommitMoney {
                username: None,
                amount: state.threshold,
            })
        }
        Intent::Raise(raw) => {
            let (_, me) = my_seat(state, username)?;
            let amount = parse_raise_amount(raw)?;
            // The wire amount is the round's total commitment, not the
            // increment.
            let commit = amount + me.money_commited_this_round;
            if !commit.is_finite() {
                return Err(ActionError::InvalidRaiseAmount(raw.clone()));
            }
            Ok(ClientMessage::CommitMoney {
                username: Some(username.clone()),
                amount: commit,
            })
        }
    }
}
