//! Parsing of the lines typed at the prompt.

use chess_core::Coordinate;
use thiserror::Error;

/// A line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A clicked square, fed to the move interpreter.
    Select(Coordinate),
    /// A promotion choice by kind name.
    Promote(String),
    /// Discard the current game and start a fresh one.
    NewGame,
    /// Redraw the board.
    Board,
    Help,
    Quit,
    /// A blank line.
    Nothing,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command: {0} (type 'help')")]
    Unknown(String),
    #[error("promote needs a piece: Bishop, Knight, Rook or Queen")]
    MissingKind,
}

pub const HELP: &str = "\
Commands:
  <square>         select a square, e.g. e2 or 6,4 (row, column)
  promote <kind>   choose Bishop, Knight, Rook or Queen for a waiting pawn
  new              start a new game
  board            redraw the board
  help             show this text
  quit             leave";

impl Command {
    /// Parses one input line.
    ///
    /// Numeric squares are not range checked here; the game ignores
    /// selections off the board.
    pub fn parse(input: &str) -> Result<Self, CommandError> {
        let input = input.trim();
        let mut parts = input.split_whitespace();

        let Some(first) = parts.next() else {
            return Ok(Command::Nothing);
        };

        match first.to_ascii_lowercase().as_str() {
            "quit" | "exit" => Ok(Command::Quit),
            "help" | "?" => Ok(Command::Help),
            "new" => Ok(Command::NewGame),
            "board" => Ok(Command::Board),
            "promote" => parts
                .next()
                .map(|kind| Command::Promote(title_case(kind)))
                .ok_or(CommandError::MissingKind),
            _ => Self::parse_square(input)
                .map(Command::Select)
                .ok_or_else(|| CommandError::Unknown(input.to_string())),
        }
    }

    /// Accepts algebraic (`e2`) or row/column pairs (`6,4` or `6 4`).
    fn parse_square(input: &str) -> Option<Coordinate> {
        if let Some(square) = Coordinate::from_algebraic(&input.to_ascii_lowercase()) {
            return Some(square);
        }
        let mut numbers = input
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(|part| part.parse::<i8>());
        match (numbers.next(), numbers.next(), numbers.next()) {
            (Some(Ok(row)), Some(Ok(col)), None) => Some(Coordinate::new(row, col)),
            _ => None,
        }
    }
}

/// Turns `queen` or `QUEEN` into the display name `Queen`.
fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
