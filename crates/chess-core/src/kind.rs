//! Piece kind representation.

use crate::Color;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a piece kind name cannot be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown piece kind: '{0}'")]
pub struct ParseKindError(pub String);

/// The kinds of chess pieces, plus the sentinel that fills empty squares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
    Empty = 6,
}

impl PieceKind {
    /// All real piece kinds in order (the empty sentinel excluded).
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Kinds a pawn may promote to.
    pub const PROMOTION_CHOICES: [PieceKind; 4] = [
        PieceKind::Bishop,
        PieceKind::Knight,
        PieceKind::Rook,
        PieceKind::Queen,
    ];

    /// Returns the index of this kind (0-6).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the layout character for this kind with the given color.
    ///
    /// The empty sentinel is written as `.`.
    pub const fn to_char(self, color: Color) -> char {
        let c = match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
            PieceKind::Empty => return '.',
        };
        match color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Parses a layout character into a kind and color.
    pub const fn from_char(c: char) -> Option<(PieceKind, Color)> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };
        Some((kind, color))
    }

    /// Returns the display name ("Pawn", "Queen", ...).
    pub const fn name(self) -> &'static str {
        match self {
            PieceKind::Pawn => "Pawn",
            PieceKind::Knight => "Knight",
            PieceKind::Bishop => "Bishop",
            PieceKind::Rook => "Rook",
            PieceKind::Queen => "Queen",
            PieceKind::King => "King",
            PieceKind::Empty => "Empty",
        }
    }

    /// Returns true if this is the empty-square sentinel.
    #[inline]
    pub const fn is_empty(self) -> bool {
        matches!(self, PieceKind::Empty)
    }

    /// Returns true if a pawn may promote to this kind.
    #[inline]
    pub const fn is_promotion_choice(self) -> bool {
        matches!(
            self,
            PieceKind::Bishop | PieceKind::Knight | PieceKind::Rook | PieceKind::Queen
        )
    }
}

impl FromStr for PieceKind {
    type Err = ParseKindError;

    /// Parses an exact display name such as `"Queen"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PieceKind::ALL
            .into_iter()
            .chain(std::iter::once(PieceKind::Empty))
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ParseKindError(s.to_string()))
    }
}

impl std::fmt::Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
