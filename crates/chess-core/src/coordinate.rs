//! Board coordinate representation.

use std::fmt;

/// A (row, column) pair addressing a square of the 8x8 board.
///
/// Row 0 is Black's back row (rank 8) and column 0 is the a-file, so White's
/// pieces start on rows 6 and 7. A coordinate may be constructed off-board
/// while generating moves; [`Coordinate::is_valid`] tells whether it addresses
/// a real square.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coordinate {
    row: i8,
    col: i8,
}

impl Coordinate {
    /// Board dimension along both axes.
    pub const SIZE: i8 = 8;

    /// Creates a coordinate without bounds checking.
    #[inline]
    pub const fn new(row: i8, col: i8) -> Self {
        Coordinate { row, col }
    }

    /// Creates a coordinate from a row-major index (0-63).
    #[inline]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < 64 {
            Some(Coordinate {
                row: (index / 8) as i8,
                col: (index % 8) as i8,
            })
        } else {
            None
        }
    }

    /// Parses a square from algebraic notation (e.g., "e4").
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return None;
        }
        Some(Coordinate {
            row: 7 - (rank - b'1') as i8,
            col: (file - b'a') as i8,
        })
    }

    /// Returns true iff both components lie in `[0, 8)`.
    #[inline]
    pub const fn is_valid(self) -> bool {
        0 <= self.row && self.row < Self::SIZE && 0 <= self.col && self.col < Self::SIZE
    }

    #[inline]
    pub const fn row(self) -> i8 {
        self.row
    }

    #[inline]
    pub const fn col(self) -> i8 {
        self.col
    }

    /// Returns the coordinate shifted by the given row and column deltas.
    ///
    /// The result may be off the board.
    #[inline]
    pub const fn offset(self, d_row: i8, d_col: i8) -> Self {
        Coordinate {
            row: self.row.wrapping_add(d_row),
            col: self.col.wrapping_add(d_col),
        }
    }

    /// Returns the row-major index (0-63), or `None` when off the board.
    #[inline]
    pub const fn index(self) -> Option<usize> {
        if self.is_valid() {
            Some(self.row as usize * 8 + self.col as usize)
        } else {
            None
        }
    }

    /// Iterates over all 64 squares in row-major order.
    pub fn all() -> impl Iterator<Item = Coordinate> {
        (0..64).filter_map(Coordinate::from_index)
    }

    /// Returns the algebraic notation for this square, or `None` when off the board.
    pub fn to_algebraic(self) -> Option<String> {
        if !self.is_valid() {
            return None;
        }
        let file = (b'a' + self.col as u8) as char;
        let rank = (b'8' - self.row as u8) as char;
        Some(format!("{}{}", file, rank))
    }
}

impl fmt::Debug for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coordinate({}, {})", self.row, self.col)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_algebraic() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "({}, {})", self.row, self.col),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn validity() {
        assert!(Coordinate::new(0, 0).is_valid());
        assert!(Coordinate::new(7, 7).is_valid());
        assert!(!Coordinate::new(-1, 0).is_valid());
        assert!(!Coordinate::new(0, 8).is_valid());
        assert!(!Coordinate::new(8, 3).is_valid());
    }

    #[test]
    fn equality_by_value() {
        assert_eq!(Coordinate::new(6, 4), Coordinate::new(6, 4));
        assert_ne!(Coordinate::new(6, 4), Coordinate::new(4, 6));
    }

    #[test]
    fn algebraic_mapping() {
        assert_eq!(Coordinate::from_algebraic("a8"), Some(Coordinate::new(0, 0)));
        assert_eq!(Coordinate::from_algebraic("e2"), Some(Coordinate::new(6, 4)));
        assert_eq!(Coordinate::from_algebraic("H1"), Some(Coordinate::new(7, 7)));
        assert_eq!(Coordinate::from_algebraic("i1"), None);
        assert_eq!(Coordinate::from_algebraic("a9"), None);
        assert_eq!(Coordinate::from_algebraic(""), None);
        assert_eq!(Coordinate::new(4, 4).to_algebraic().as_deref(), Some("e4"));
        assert_eq!(Coordinate::new(-1, 4).to_algebraic(), None);
    }

    #[test]
    fn index_round_trip() {
        assert_eq!(Coordinate::new(0, 0).index(), Some(0));
        assert_eq!(Coordinate::new(7, 7).index(), Some(63));
        assert_eq!(Coordinate::new(8, 0).index(), None);
        assert_eq!(Coordinate::from_index(12), Some(Coordinate::new(1, 4)));
        assert_eq!(Coordinate::from_index(64), None);
        assert_eq!(Coordinate::all().count(), 64);
    }

    #[test]
    fn offset_leaves_board() {
        let corner = Coordinate::new(0, 7);
        assert!(!corner.offset(-1, 0).is_valid());
        assert!(!corner.offset(0, 1).is_valid());
        assert_eq!(corner.offset(2, -1), Coordinate::new(2, 6));
    }

    proptest! {
        #[test]
        fn index_agrees_with_is_valid(row in -20i8..20, col in -20i8..20) {
            let c = Coordinate::new(row, col);
            prop_assert_eq!(c.index().is_some(), c.is_valid());
            prop_assert_eq!(c.to_algebraic().is_some(), c.is_valid());
        }
    }
}
