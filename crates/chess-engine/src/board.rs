//! Board and piece representation.
//!
//! The board is an 8x8 grid that always holds a [`Piece`] value in every
//! slot: unoccupied squares carry the [`PieceKind::Empty`] sentinel. Each
//! piece remembers its own coordinate, which always matches its slot.

use chess_core::{Color, Coordinate, Layout, PieceKind};

/// The squares a piece may move to, with a fixed maximum capacity.
///
/// No piece ever has more than 27 destinations (a centralised queen), so a
/// fixed-size array avoids heap allocations during every notification pass.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Destinations {
    squares: [Coordinate; Self::MAX],
    len: usize,
}

impl Destinations {
    /// Maximum number of destinations held for a single piece.
    pub const MAX: usize = 32;

    /// Creates an empty destination list.
    #[inline]
    pub const fn new() -> Self {
        Destinations {
            squares: [Coordinate::new(0, 0); Self::MAX],
            len: 0,
        }
    }

    /// Adds a destination to the list.
    #[inline]
    pub fn push(&mut self, to: Coordinate) {
        debug_assert!(self.len < Self::MAX);
        if self.len < Self::MAX {
            self.squares[self.len] = to;
            self.len += 1;
        }
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Coordinate] {
        &self.squares[..self.len]
    }

    #[inline]
    pub fn contains(&self, to: Coordinate) -> bool {
        self.as_slice().contains(&to)
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }
}

impl Default for Destinations {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a Destinations {
    type Item = &'a Coordinate;
    type IntoIter = std::slice::Iter<'a, Coordinate>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for Destinations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// A single board slot's occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    /// `None` only for the empty sentinel.
    color: Option<Color>,
    at: Coordinate,
    has_moved: bool,
    threatened: bool,
    options: Destinations,
}

impl Piece {
    /// Creates an unmoved piece of the given kind.
    ///
    /// Passing [`PieceKind::Empty`] yields the sentinel regardless of `color`.
    pub fn new(kind: PieceKind, color: Color, at: Coordinate) -> Self {
        if kind.is_empty() {
            return Piece::empty(at);
        }
        Piece {
            kind,
            color: Some(color),
            at,
            has_moved: false,
            threatened: false,
            options: Destinations::new(),
        }
    }

    /// Creates the sentinel for an unoccupied square.
    pub const fn empty(at: Coordinate) -> Self {
        Piece {
            kind: PieceKind::Empty,
            color: None,
            at,
            has_moved: false,
            threatened: false,
            options: Destinations::new(),
        }
    }

    #[inline]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Returns the piece's color, or `None` for the empty sentinel.
    #[inline]
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    #[inline]
    pub fn coordinate(&self) -> Coordinate {
        self.at
    }

    #[inline]
    pub fn has_moved(&self) -> bool {
        self.has_moved
    }

    /// True iff some opposing piece can currently capture this piece.
    #[inline]
    pub fn is_threatened(&self) -> bool {
        self.threatened
    }

    /// Destinations computed for this piece in the latest notification pass.
    ///
    /// Only pieces of the side to move carry options.
    #[inline]
    pub fn options(&self) -> &Destinations {
        &self.options
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.kind.is_empty()
    }

    /// Returns true if this is a real piece of the given color.
    #[inline]
    pub fn is_color(&self, color: Color) -> bool {
        self.color == Some(color)
    }

    /// Returns true if this is a real piece of the color opposing `color`.
    #[inline]
    pub fn is_opponent_of(&self, color: Color) -> bool {
        self.color == Some(color.opposite())
    }

    /// Returns the layout character (`.` for an empty square).
    pub fn to_char(&self) -> char {
        match self.color {
            Some(color) => self.kind.to_char(color),
            None => '.',
        }
    }

    pub(crate) fn with_moved(mut self, has_moved: bool) -> Self {
        self.has_moved = has_moved;
        self
    }

    pub(crate) fn set_options(&mut self, options: Destinations) {
        self.options = options;
    }
}

/// The 8x8 grid of pieces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: [Piece; 64],
}

impl Board {
    /// Creates a board with every square holding the empty sentinel.
    pub fn empty() -> Self {
        Board {
            squares: std::array::from_fn(|index| {
                Piece::empty(Coordinate::new((index / 8) as i8, (index % 8) as i8))
            }),
        }
    }

    /// Creates the standard starting board.
    pub fn standard() -> Self {
        Self::from_layout(&Layout::standard())
    }

    /// Creates a board from a layout.
    ///
    /// Pieces standing off their home squares are marked as already moved:
    /// pawns off their start row, and kings and rooks off their starting
    /// squares. This keeps double steps and castling honest for custom
    /// positions.
    pub fn from_layout(layout: &Layout) -> Self {
        let mut board = Board::empty();
        for (at, kind, color) in layout.pieces() {
            let at_home = match kind {
                PieceKind::Pawn => at.row() == color.pawn_row(),
                PieceKind::King => at == Coordinate::new(color.back_row(), 4),
                PieceKind::Rook => {
                    at.row() == color.back_row() && (at.col() == 0 || at.col() == 7)
                }
                _ => true,
            };
            board.place(Piece::new(kind, color, at).with_moved(!at_home));
        }
        board
    }

    /// Returns the piece at a coordinate, or `None` when off the board.
    #[inline]
    pub fn get(&self, at: Coordinate) -> Option<&Piece> {
        at.index().map(|index| &self.squares[index])
    }

    /// Returns true if the coordinate is on the board and holds the sentinel.
    #[inline]
    pub fn is_empty_at(&self, at: Coordinate) -> bool {
        self.get(at).is_some_and(Piece::is_empty)
    }

    /// True iff `at` is on the board and is either empty or holds a piece of
    /// the color opposing `mover`.
    pub fn is_destination_legal(&self, at: Coordinate, mover: Color) -> bool {
        match self.get(at) {
            Some(piece) => piece.is_empty() || piece.is_opponent_of(mover),
            None => false,
        }
    }

    /// Iterates over all squares in row-major order.
    pub fn squares(&self) -> impl Iterator<Item = &Piece> {
        self.squares.iter()
    }

    /// Iterates over the real pieces of one color in row-major order.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = &Piece> {
        self.squares.iter().filter(move |piece| piece.is_color(color))
    }

    /// Returns the king of the given color, if one is on the board.
    pub fn king_of(&self, color: Color) -> Option<&Piece> {
        self.pieces_of(color)
            .find(|piece| piece.kind() == PieceKind::King)
    }

    /// Returns true if the king and the rook in the given corner are both
    /// unmoved. `kingside` selects column 7, otherwise column 0.
    pub fn castling_available(&self, color: Color, kingside: bool) -> bool {
        let Some(king) = self.king_of(color) else {
            return false;
        };
        if king.has_moved() {
            return false;
        }
        let corner = Coordinate::new(king.coordinate().row(), if kingside { 7 } else { 0 });
        self.get(corner).is_some_and(|rook| {
            rook.kind() == PieceKind::Rook && rook.is_color(color) && !rook.has_moved()
        })
    }

    /// Returns the equivalent layout (flags are not part of a layout).
    pub fn to_layout(&self) -> Layout {
        let mut layout = Layout::empty();
        for piece in self.squares.iter() {
            if let Some(color) = piece.color() {
                layout.place(piece.coordinate(), piece.kind(), color);
            }
        }
        layout
    }

    fn slot_mut(&mut self, at: Coordinate) -> Option<&mut Piece> {
        at.index().map(move |index| &mut self.squares[index])
    }

    /// Installs a piece into the slot named by its own coordinate.
    pub(crate) fn place(&mut self, piece: Piece) {
        if let Some(slot) = self.slot_mut(piece.coordinate()) {
            *slot = piece;
        }
    }

    /// Replaces the occupant of `at` with the empty sentinel, returning the
    /// piece that was there.
    pub(crate) fn clear_square(&mut self, at: Coordinate) -> Option<Piece> {
        let slot = self.slot_mut(at)?;
        Some(std::mem::replace(slot, Piece::empty(at)))
    }

    /// Moves the piece standing on `from` to `to`.
    ///
    /// The origin is cleared, the piece is marked as moved and takes the
    /// destination coordinate. Any capture must already have been removed.
    /// A two-square king move also brings the corner rook across to the
    /// square beside the king's destination.
    pub(crate) fn move_to(&mut self, from: Coordinate, to: Coordinate) {
        if !to.is_valid() {
            return;
        }
        let Some(mut piece) = self.clear_square(from) else {
            return;
        };
        if piece.is_empty() {
            return;
        }

        piece.has_moved = true;
        piece.at = to;
        self.place(piece);

        if piece.kind() == PieceKind::King && (to.col() - from.col()).abs() == 2 {
            let (corner, landing) = if to.col() < from.col() {
                (Coordinate::new(from.row(), 0), to.offset(0, 1))
            } else {
                (Coordinate::new(from.row(), 7), to.offset(0, -1))
            };
            let rook_ready = self.get(corner).is_some_and(|rook| {
                rook.kind() == PieceKind::Rook && rook.color() == piece.color()
            });
            if rook_ready {
                self.move_to(corner, landing);
            }
        }
    }

    pub(crate) fn clear_threats(&mut self) {
        for piece in self.squares.iter_mut() {
            piece.threatened = false;
        }
    }

    pub(crate) fn clear_options(&mut self) {
        for piece in self.squares.iter_mut() {
            piece.options.clear();
        }
    }

    /// Marks every real piece whose square bit is set in `mask` as threatened.
    pub(crate) fn mark_threats(&mut self, mask: u64) {
        for (index, piece) in self.squares.iter_mut().enumerate() {
            if mask & (1u64 << index) != 0 && !piece.is_empty() {
                piece.threatened = true;
            }
        }
    }

    pub(crate) fn set_options_at(&mut self, at: Coordinate, options: Destinations) {
        if let Some(slot) = self.slot_mut(at) {
            slot.set_options(options);
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(row: i8, col: i8) -> Coordinate {
        Coordinate::new(row, col)
    }

    #[test]
    fn every_square_holds_a_piece() {
        let board = Board::standard();
        assert_eq!(board.squares().count(), 64);
        for (index, piece) in board.squares().enumerate() {
            assert_eq!(piece.coordinate().index(), Some(index));
        }
        assert!(board.get(at(4, 4)).unwrap().is_empty());
        assert!(board.get(at(8, 0)).is_none());
    }

    #[test]
    fn standard_setup() {
        let board = Board::standard();
        let king = board.king_of(Color::White).unwrap();
        assert_eq!(king.coordinate(), at(7, 4));
        assert!(!king.has_moved());
        assert_eq!(board.pieces_of(Color::Black).count(), 16);
        assert_eq!(board.get(at(0, 4)).map(Piece::to_char), Some('k'));
        assert_eq!(board.to_layout(), Layout::standard());
    }

    #[test]
    fn destination_legality() {
        let board = Board::standard();
        assert!(board.is_destination_legal(at(4, 4), Color::White));
        assert!(board.is_destination_legal(at(1, 4), Color::White));
        assert!(!board.is_destination_legal(at(6, 4), Color::White));
        assert!(!board.is_destination_legal(at(-1, 4), Color::White));
        assert!(!board.is_destination_legal(at(3, 8), Color::Black));
    }

    #[test]
    fn move_to_updates_slots() {
        let mut board = Board::standard();
        board.move_to(at(6, 4), at(4, 4));
        assert!(board.is_empty_at(at(6, 4)));
        let pawn = board.get(at(4, 4)).unwrap();
        assert_eq!(pawn.kind(), PieceKind::Pawn);
        assert_eq!(pawn.coordinate(), at(4, 4));
        assert!(pawn.has_moved());
    }

    #[test]
    fn king_two_step_brings_rook() {
        let layout = Layout::parse("r3k2r/8/8/8/8/8/8/R3K2R").unwrap();
        let mut board = Board::from_layout(&layout);

        board.move_to(at(7, 4), at(7, 6));
        let rook = board.get(at(7, 5)).unwrap();
        assert_eq!(rook.kind(), PieceKind::Rook);
        assert!(rook.has_moved());
        assert!(board.is_empty_at(at(7, 7)));

        board.move_to(at(0, 4), at(0, 2));
        let rook = board.get(at(0, 3)).unwrap();
        assert_eq!(rook.kind(), PieceKind::Rook);
        assert!(rook.is_color(Color::Black));
        assert!(board.is_empty_at(at(0, 0)));
    }

    #[test]
    fn layout_infers_moved_flags() {
        let layout = Layout::parse("4k3/8/4P3/8/8/8/P7/R5K1").unwrap();
        let board = Board::from_layout(&layout);
        assert!(!board.get(at(6, 0)).unwrap().has_moved());
        assert!(board.get(at(2, 4)).unwrap().has_moved());
        assert!(!board.get(at(7, 0)).unwrap().has_moved());
        assert!(board.get(at(7, 6)).unwrap().has_moved());
        assert!(!board.get(at(0, 4)).unwrap().has_moved());
    }

    #[test]
    fn castling_availability() {
        let layout = Layout::parse("r3k3/8/8/8/8/8/8/R3K2R").unwrap();
        let board = Board::from_layout(&layout);
        assert!(board.castling_available(Color::White, true));
        assert!(board.castling_available(Color::White, false));
        assert!(!board.castling_available(Color::Black, true));
        assert!(board.castling_available(Color::Black, false));
    }

    #[test]
    fn threat_marks_skip_empty_squares() {
        let mut board = Board::standard();
        board.mark_threats(u64::MAX);
        assert!(board.get(at(0, 0)).unwrap().is_threatened());
        assert!(!board.get(at(4, 4)).unwrap().is_threatened());
        board.clear_threats();
        assert!(board.squares().all(|piece| !piece.is_threatened()));
    }

    #[test]
    fn destinations_capacity() {
        let mut list = Destinations::new();
        assert!(list.is_empty());
        list.push(at(1, 1));
        list.push(at(2, 2));
        assert_eq!(list.len(), 2);
        assert!(list.contains(at(2, 2)));
        assert!(!list.contains(at(3, 3)));
        list.clear();
        assert!(list.is_empty());
    }
}
