//! Plain-text rendering of the session for the terminal.
//!
//! Everything here returns strings so the driver decides where they go.

use headwins::{
    LogRecord, Session, SyncPhase, actions,
    entities::{PlayerShared, pretty_card},
};

const WIDTH: usize = 64;

/// One log line, e.g. `[14:02:11 CHAT ]: Player 12: hi`.
pub fn render_record(record: &LogRecord) -> String {
    format!(
        "[{} {:5}]: {}",
        record.datetime.format("%H:%M:%S"),
        record.kind.to_string(),
        record.content
    )
}

fn render_cards(cards: &[String]) -> String {
    cards
        .iter()
        .map(|card| pretty_card(card))
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_seat(index: usize, player: &PlayerShared, me: &str) -> String {
    let mut markers = Vec::new();
    if player.username.as_str() == me {
        markers.push("you");
    }
    if player.your_turn {
        markers.push("→");
    }
    if !player.is_in_hand {
        markers.push("folded");
    } else if !player.is_active {
        markers.push("out");
    }
    let markers = if markers.is_empty() {
        String::new()
    } else {
        format!(" ({})", markers.join("/"))
    };

    format!(
        "  {}. {}{} - ${} - in ${}",
        index + 1,
        player.username,
        markers,
        player.stack_size,
        player.money_commited_this_round
    )
}

/// The table as the latest snapshot describes it, plus the player's own
/// cards while they're still in the hand.
pub fn render_table(session: &Session) -> String {
    let Some(state) = session.state() else {
        return match session.phase() {
            SyncPhase::Disconnected => "Not connected".to_string(),
            phase => format!("No table yet ({phase})"),
        };
    };

    let mut lines = vec![
        "═".repeat(WIDTH),
        format!(
            "Blinds: ${}/{}   Pot: ${}   To call: ${}",
            state.small_blind, state.big_blind, state.pot, state.threshold
        ),
    ];
    if !state.started {
        lines.push("Waiting for the game to start".to_string());
    }
    if !state.board.is_empty() {
        lines.push(format!("Board: {}", render_cards(&state.board)));
    }
    lines.push("─".repeat(WIDTH));

    if state.players.is_empty() {
        lines.push("No players at table".to_string());
    } else {
        let me = session.username().as_str();
        lines.extend(
            state
                .players
                .iter()
                .enumerate()
                .map(|(i, player)| render_seat(i, player, me)),
        );
    }

    let hand = session.visible_hand();
    if !hand.is_empty() {
        lines.push("─".repeat(WIDTH));
        lines.push(format!("Your cards: {}", render_cards(hand)));
    }
    lines.push("═".repeat(WIDTH));
    lines.join("\n")
}

/// The actions on offer, or `None` when it isn't this player's turn.
pub fn render_controls(session: &Session) -> Option<String> {
    let state = session.state()?;
    let me = session.me().filter(|me| me.your_turn)?;
    let label = actions::call_label(state, me);
    Some(format!(
        "It's your turn! fold | {} | raise AMOUNT",
        label.to_string().to_lowercase()
    ))
}
