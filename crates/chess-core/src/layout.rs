//! Board layouts: the piece placement a game starts from.
//!
//! A layout is written like the placement field of FEN: eight rows separated
//! by `/`, row 0 (Black's back row) first, pieces as letters (uppercase for
//! White) and runs of empty squares as digits.

use crate::{Color, Coordinate, PieceKind};
use thiserror::Error;

/// Errors that can occur when parsing a layout string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("invalid layout: expected 8 rows, got {0}")]
    InvalidRowCount(usize),

    #[error("invalid layout: row {row} has {squares} squares, expected 8")]
    InvalidRowWidth { row: usize, squares: u32 },

    #[error("invalid layout: unknown character '{c}' in row {row}")]
    InvalidCharacter { row: usize, c: char },
}

/// A parsed piece placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    squares: [Option<(PieceKind, Color)>; 64],
}

impl Layout {
    /// The standard starting placement.
    pub const STANDARD: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

    /// Creates a layout with no pieces.
    pub const fn empty() -> Self {
        Layout {
            squares: [None; 64],
        }
    }

    /// Creates the standard starting layout.
    pub fn standard() -> Self {
        let mut layout = Layout::empty();
        let back = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for color in Color::ALL {
            for (col, kind) in back.iter().enumerate() {
                let col = col as i8;
                layout.place(Coordinate::new(color.back_row(), col), *kind, color);
                layout.place(Coordinate::new(color.pawn_row(), col), PieceKind::Pawn, color);
            }
        }
        layout
    }

    /// Parses a layout string.
    pub fn parse(placement: &str) -> Result<Self, LayoutError> {
        let rows: Vec<&str> = placement.trim().split('/').collect();
        if rows.len() != 8 {
            return Err(LayoutError::InvalidRowCount(rows.len()));
        }

        let mut layout = Layout::empty();
        for (row, text) in rows.iter().enumerate() {
            let mut col: u32 = 0;
            for c in text.chars() {
                if let Some(run) = c.to_digit(10) {
                    col += run;
                } else if let Some((kind, color)) = PieceKind::from_char(c) {
                    if col < 8 {
                        layout.place(Coordinate::new(row as i8, col as i8), kind, color);
                    }
                    col += 1;
                } else {
                    return Err(LayoutError::InvalidCharacter { row, c });
                }
            }
            if col != 8 {
                return Err(LayoutError::InvalidRowWidth { row, squares: col });
            }
        }

        Ok(layout)
    }

    /// Places a piece, replacing whatever the layout held there.
    ///
    /// Off-board coordinates and the empty kind are ignored.
    pub fn place(&mut self, at: Coordinate, kind: PieceKind, color: Color) {
        if kind.is_empty() {
            return;
        }
        if let Some(index) = at.index() {
            self.squares[index] = Some((kind, color));
        }
    }

    /// Returns the piece placed at a coordinate, if any.
    pub fn get(&self, at: Coordinate) -> Option<(PieceKind, Color)> {
        at.index().and_then(|index| self.squares[index])
    }

    /// Iterates over all placed pieces in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = (Coordinate, PieceKind, Color)> + '_ {
        Coordinate::all().filter_map(move |at| self.get(at).map(|(kind, color)| (at, kind, color)))
    }

    /// Converts the layout back to its string form.
    pub fn to_placement(&self) -> String {
        let mut out = String::with_capacity(71);
        for row in 0..8 {
            if row > 0 {
                out.push('/');
            }
            let mut run = 0;
            for col in 0..8 {
                match self.get(Coordinate::new(row, col)) {
                    Some((kind, color)) => {
                        if run > 0 {
                            out.push_str(&run.to_string());
                            run = 0;
                        }
                        out.push(kind.to_char(color));
                    }
                    None => run += 1,
                }
            }
            if run > 0 {
                out.push_str(&run.to_string());
            }
        }
        out
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_matches_string() {
        assert_eq!(Layout::parse(Layout::STANDARD).unwrap(), Layout::standard());
        assert_eq!(Layout::standard().to_placement(), Layout::STANDARD);
    }

    #[test]
    fn standard_squares() {
        let layout = Layout::standard();
        assert_eq!(
            layout.get(Coordinate::new(7, 4)),
            Some((PieceKind::King, Color::White))
        );
        assert_eq!(
            layout.get(Coordinate::new(0, 3)),
            Some((PieceKind::Queen, Color::Black))
        );
        assert_eq!(
            layout.get(Coordinate::new(6, 0)),
            Some((PieceKind::Pawn, Color::White))
        );
        assert_eq!(layout.get(Coordinate::new(4, 4)), None);
        assert_eq!(layout.pieces().count(), 32);
    }

    #[test]
    fn parse_custom_layout() {
        let layout = Layout::parse("4k3/8/8/8/8/8/8/4K2R").unwrap();
        assert_eq!(layout.pieces().count(), 3);
        assert_eq!(
            layout.get(Coordinate::new(7, 7)),
            Some((PieceKind::Rook, Color::White))
        );
        assert_eq!(layout.to_placement(), "4k3/8/8/8/8/8/8/4K2R");
    }

    #[test]
    fn invalid_row_count() {
        assert_eq!(
            Layout::parse("8/8/8/8/8/8/8"),
            Err(LayoutError::InvalidRowCount(7))
        );
    }

    #[test]
    fn invalid_character() {
        assert_eq!(
            Layout::parse("rnbqkbnr/pppppppp/8/8/8/8/PPPPXPPP/RNBQKBNR"),
            Err(LayoutError::InvalidCharacter { row: 6, c: 'X' })
        );
    }

    #[test]
    fn invalid_row_width() {
        assert_eq!(
            Layout::parse("rnbqkbnrr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"),
            Err(LayoutError::InvalidRowWidth { row: 0, squares: 9 })
        );
        assert_eq!(
            Layout::parse("7/8/8/8/8/8/8/8"),
            Err(LayoutError::InvalidRowWidth { row: 0, squares: 7 })
        );
    }

    #[test]
    fn error_display() {
        let err = LayoutError::InvalidRowCount(3);
        assert!(format!("{}", err).contains('3'));
        let err = LayoutError::InvalidCharacter { row: 2, c: 'z' };
        assert!(format!("{}", err).contains('z'));
    }
}
