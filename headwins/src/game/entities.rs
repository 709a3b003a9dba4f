use rand::Rng;
use serde::{Deserialize, Serialize, Serializer};
use std::{borrow::Borrow, fmt};

/// Type alias for chip amounts. The server does its arithmetic on plain
/// JSON numbers, so pots and bets can pick up fractions once any client
/// raises by one.
pub type Usd = f64;

/// Largest magnitude below which every whole `f64` is an exact integer.
const MAX_EXACT_WHOLE: f64 = 9_007_199_254_740_992.0;

/// Serialize a chip amount as a JSON integer when it's whole, so `50.0`
/// goes out as `50` and `22.5` as `22.5`.
pub(crate) fn serialize_chips<S>(amount: &Usd, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if amount.fract() == 0.0 && amount.abs() < MAX_EXACT_WHOLE {
        serializer.serialize_i64(*amount as i64)
    } else {
        serializer.serialize_f64(*amount)
    }
}

/// A player's display name. It is the player's only identity on the wire:
/// the server matches seats, turns, and chat lines against it verbatim.
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    pub fn new(s: &str) -> Self {
        Self(s.to_string())
    }

    /// Generate a name of the form `Player N` with `N` drawn from 1..=100.
    ///
    /// Nothing guarantees two clients won't draw the same name. The server
    /// will happily seat both, and each client will then see the other's
    /// seat as its own.
    pub fn random() -> Self {
        let n: u8 = rand::rng().random_range(1..=100);
        Self(format!("Player {n}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Username {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for Username {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// One seat at the table as the server describes it.
///
/// Field names mirror the server's payload exactly, including the
/// camel-cased flags and the `commited` spelling.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct PlayerShared {
    pub username: Username,
    /// Whether the seat is live in the current hand context.
    #[serde(rename = "isActive")]
    pub is_active: bool,
    /// False once the seat has folded or is sitting out.
    #[serde(rename = "isInHand")]
    pub is_in_hand: bool,
    #[serde(serialize_with = "serialize_chips")]
    pub stack_size: Usd,
    #[serde(serialize_with = "serialize_chips")]
    pub current_raised: Usd,
    /// Chips put in by this seat during the current betting round.
    /// Compared against [`SharedGameState::threshold`] to decide between
    /// checking and calling.
    #[serde(serialize_with = "serialize_chips")]
    pub money_commited_this_round: Usd,
    pub your_turn: bool,
}

/// The authoritative table snapshot. Each update from the server replaces
/// the previous snapshot entirely.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct SharedGameState {
    #[serde(serialize_with = "serialize_chips")]
    pub pot: Usd,
    /// Community cards, 0 to 5 entries.
    pub board: Vec<String>,
    /// Seats in seating order.
    pub players: Vec<PlayerShared>,
    #[serde(serialize_with = "serialize_chips")]
    pub small_blind: Usd,
    #[serde(serialize_with = "serialize_chips")]
    pub big_blind: Usd,
    /// The amount a player must have committed this round to stay in
    /// without folding, i.e. the current bet to call.
    #[serde(serialize_with = "serialize_chips")]
    pub threshold: Usd,
    #[serde(serialize_with = "serialize_chips")]
    pub last_raise: Usd,
    pub started: bool,
}

impl SharedGameState {
    /// Look up a seat by exact username.
    pub fn player(&self, username: &str) -> Option<&PlayerShared> {
        self.players.iter().find(|p| p.username.as_str() == username)
    }

    /// Seats that currently hold the action. Well-formed snapshots have at
    /// most one.
    pub fn turn_holders(&self) -> impl Iterator<Item = &PlayerShared> {
        self.players.iter().filter(|p| p.your_turn)
    }
}

/// Render a card string such as `"Ah"` or `"Td"` with a suit symbol.
/// Anything that doesn't end in a known suit letter is returned unchanged.
pub fn pretty_card(card: &str) -> String {
    let mut chars = card.chars();
    let suit = match chars.next_back() {
        Some('h') => "♥",
        Some('d') => "♦",
        Some('c') => "♣",
        Some('s') => "♠",
        _ => return card.to_string(),
    };
    let rank = chars.as_str();
    if rank.is_empty() {
        return card.to_string();
    }
    format!("{rank}{suit}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_keeps_whitespace() {
        let username = Username::new("Player 42");
        assert_eq!(username.as_str(), "Player 42");
        assert_eq!(username.to_string(), "Player 42");
    }

    #[test]
    fn test_random_username_in_range() {
        for _ in 0..200 {
            let username = Username::random();
            let n: u8 = username
                .as_str()
                .strip_prefix("Player ")
                .expect("random names start with 'Player '")
                .parse()
                .expect("suffix is a number");
            assert!((1..=100).contains(&n));
        }
    }

    #[test]
    fn test_player_wire_field_names() {
        let player = PlayerShared {
            username: Username::new("alice"),
            is_active: true,
            is_in_hand: true,
            stack_size: 100.0,
            current_raised: 0.0,
            money_commited_this_round: 20.0,
            your_turn: true,
        };
        let json = serde_json::to_value(&player).unwrap();
        assert_eq!(json["isActive"], true);
        assert_eq!(json["isInHand"], true);
        assert_eq!(json["money_commited_this_round"], 20);
        assert_eq!(json["your_turn"], true);
        assert!(json.get("is_active").is_none());
    }

    #[test]
    fn test_player_missing_fields_default() {
        // The server never sends `current_raised`.
        let player: PlayerShared = serde_json::from_str(
            r#"{"username":"bob","isActive":true,"isInHand":false,"stack_size":40,
                "money_commited_this_round":10,"your_turn":false}"#,
        )
        .unwrap();
        assert_eq!(player.current_raised, 0.0);
        assert_eq!(player.stack_size, 40.0);
        assert!(!player.is_in_hand);
    }

    #[test]
    fn test_fractional_chips_round_trip_the_wire() {
        let raw = serde_json::json!({
            "pot": 72.5,
            "threshold": 22.5,
            "players": [{"username": "bob", "money_commited_this_round": 22.5, "stack_size": 80}]
        });
        let state: SharedGameState = serde_json::from_value(raw).unwrap();
        assert_eq!(state.pot, 72.5);
        assert_eq!(state.threshold, 22.5);
        assert_eq!(state.players[0].money_commited_this_round, 22.5);

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["threshold"], 22.5);
        // Whole amounts stay integers on the wire.
        assert_eq!(json["players"][0]["stack_size"], 80);
        assert!(json["players"][0]["stack_size"].is_u64());
    }

    #[test]
    fn test_state_player_lookup() {
        let state = SharedGameState {
            players: vec![
                PlayerShared {
                    username: Username::new("alice"),
                    ..Default::default()
                },
                PlayerShared {
                    username: Username::new("bob"),
                    your_turn: true,
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        assert!(state.player("bob").unwrap().your_turn);
        assert!(state.player("carol").is_none());
        assert_eq!(state.turn_holders().count(), 1);
    }

    #[test]
    fn test_pretty_card() {
        assert_eq!(pretty_card("Ah"), "A♥");
        assert_eq!(pretty_card("Td"), "T♦");
        assert_eq!(pretty_card("9c"), "9♣");
        assert_eq!(pretty_card("Ks"), "K♠");
        assert_eq!(pretty_card("??"), "??");
        assert_eq!(pretty_card("h"), "h");
        assert_eq!(pretty_card(""), "");
    }
}
