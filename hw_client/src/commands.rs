use headwins::Intent;
use std::fmt;

/// Commands the player can type at the prompt.
pub const HELP: &str = "\
Commands:
  fold              Fold your hand
  check, call       Check if you've matched the bet, call otherwise
  raise AMOUNT      Raise by AMOUNT on top of what you've put in this round
  start             Ask the server to start the game
  say TEXT          Send a chat message (also: /say TEXT)
  state             Show the table again
  help              Show this message
  quit, exit        Leave the table
";

/// What a line of user input asks the client to do.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum UserCommand {
    /// Something to translate and send to the server.
    Act(Intent),
    /// Redraw the table.
    ShowState,
    Help,
    Quit,
}

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// `raise` without an amount.
    MissingRaiseAmount,
    /// `say` without anything to say.
    MissingChatText,
    /// Unrecognized command.
    UnrecognizedCommand(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRaiseAmount => {
                write!(f, "Raise requires an amount (e.g., 'raise 100')")
            }
            Self::MissingChatText => write!(f, "Say what? (e.g., 'say good luck')"),
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '{cmd}'. Type 'help' to see available commands"
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse a line of user input into a [`UserCommand`].
///
/// Raise amounts are passed through as typed; validating them needs the
/// current table, so that happens when the intent is translated.
///
/// # Examples
///
/// ```
/// use headwins::Intent;
/// use hw_client::commands::{UserCommand, parse_command};
///
/// assert_eq!(parse_command("fold"), Ok(UserCommand::Act(Intent::Fold)));
/// assert_eq!(parse_command("call"), Ok(UserCommand::Act(Intent::CheckOrCall)));
/// assert_eq!(
///     parse_command("raise 100"),
///     Ok(UserCommand::Act(Intent::Raise("100".to_string())))
/// );
/// ```
pub fn parse_command(input: &str) -> Result<UserCommand, ParseError> {
    let trimmed = input.trim();

    match trimmed {
        "fold" => return Ok(UserCommand::Act(Intent::Fold)),
        "check" | "call" => return Ok(UserCommand::Act(Intent::CheckOrCall)),
        "start" => return Ok(UserCommand::Act(Intent::StartGame)),
        "state" => return Ok(UserCommand::ShowState),
        "help" => return Ok(UserCommand::Help),
        "quit" | "exit" => return Ok(UserCommand::Quit),
        _ => {}
    }

    let (head, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (trimmed, ""),
    };
    match head {
        "raise" if rest.is_empty() => Err(ParseError::MissingRaiseAmount),
        "raise" => Ok(UserCommand::Act(Intent::Raise(rest.to_string()))),
        "say" | "/say" if rest.is_empty() => Err(ParseError::MissingChatText),
        "say" | "/say" => Ok(UserCommand::Act(Intent::Chat(rest.to_string()))),
        _ => Err(ParseError::UnrecognizedCommand(trimmed.to_string())),
    }
}
