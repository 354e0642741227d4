//! Move generation.
//!
//! Each piece kind generates its own options through a [`MoveScan`], which
//! borrows the board for the duration of the scan. Options that would leave
//! the mover's king threatened are filtered out; threat marks are recorded
//! from a piece's full reach, so a pinned piece still gives check.

use crate::board::{Board, Destinations};
use chess_core::{Color, Coordinate, PieceKind};

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
];

const ROOK_DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];

const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, 1), (1, -1)];

/// Whether a scan filters out options that expose the mover's own king.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Filter {
    /// Every reachable square is an option.
    Reach,
    /// Only squares that keep the mover's king safe are options.
    Legal,
}

/// Option generation for a single piece.
struct MoveScan<'a> {
    board: &'a Board,
    from: Coordinate,
    color: Color,
    filter: Filter,
    options: Destinations,
    /// Bitmask of occupied squares this piece could capture on.
    threats: u64,
}

impl<'a> MoveScan<'a> {
    fn new(board: &'a Board, from: Coordinate, color: Color, filter: Filter) -> Self {
        MoveScan {
            board,
            from,
            color,
            filter,
            options: Destinations::new(),
            threats: 0,
        }
    }

    /// True iff the target is on the board and either empty or held by an
    /// opposing piece. When true, an occupant is marked as threatened.
    fn can_move_to(&mut self, to: Coordinate) -> bool {
        if !self.board.is_destination_legal(to, self.color) {
            return false;
        }
        if let (Some(index), false) = (to.index(), self.board.is_empty_at(to)) {
            self.threats |= 1u64 << index;
        }
        true
    }

    /// Records `to` as an option if the piece can move there.
    fn offer(&mut self, to: Coordinate) -> bool {
        if !self.can_move_to(to) || !self.keeps_king_safe(to) {
            return false;
        }
        self.options.push(to);
        true
    }

    fn keeps_king_safe(&self, to: Coordinate) -> bool {
        if self.filter == Filter::Reach {
            return true;
        }
        let mut after = self.board.clone();
        after.clear_square(to);
        after.move_to(self.from, to);
        match after.king_of(self.color) {
            Some(king) => !is_attacked(&after, king.coordinate(), self.color.opposite()),
            None => true,
        }
    }

    fn generate(&mut self) {
        let (kind, has_moved) = match self.board.get(self.from) {
            Some(piece) => (piece.kind(), piece.has_moved()),
            None => return,
        };
        match kind {
            PieceKind::Pawn => self.pawn(has_moved),
            PieceKind::Knight => self.leaper(&KNIGHT_OFFSETS),
            PieceKind::Bishop => self.slider(&BISHOP_DIRECTIONS),
            PieceKind::Rook => self.slider(&ROOK_DIRECTIONS),
            PieceKind::Queen => {
                self.slider(&ROOK_DIRECTIONS);
                self.slider(&BISHOP_DIRECTIONS);
            }
            PieceKind::King => {
                self.leaper(&KING_OFFSETS);
                if !has_moved {
                    self.castling(false);
                    self.castling(true);
                }
            }
            PieceKind::Empty => {}
        }
    }

    fn pawn(&mut self, has_moved: bool) {
        let dir = self.color.pawn_direction();

        let one = self.from.offset(dir, 0);
        if self.board.is_empty_at(one) {
            self.offer(one);
            let two = self.from.offset(2 * dir, 0);
            if !has_moved && self.board.is_empty_at(two) {
                self.offer(two);
            }
        }

        for side in [-1, 1] {
            let diagonal = self.from.offset(dir, side);
            let occupied_by_opponent = self
                .board
                .get(diagonal)
                .is_some_and(|target| target.is_opponent_of(self.color));
            if occupied_by_opponent {
                self.offer(diagonal);
            }
        }
    }

    fn leaper(&mut self, offsets: &[(i8, i8)]) {
        for &(d_row, d_col) in offsets {
            self.offer(self.from.offset(d_row, d_col));
        }
    }

    fn slider(&mut self, directions: &[(i8, i8)]) {
        for &(d_row, d_col) in directions {
            let mut to = self.from.offset(d_row, d_col);
            while to.is_valid() {
                self.offer(to);
                if !self.board.is_empty_at(to) {
                    break;
                }
                to = to.offset(d_row, d_col);
            }
        }
    }

    /// Offers a two-square king move towards the corner rook.
    ///
    /// Requires an unmoved rook of the same color in the corner, every square
    /// between king and rook empty, and the adjacent square already offered as
    /// an ordinary king move. Whether the king currently stands in check is
    /// not examined.
    fn castling(&mut self, kingside: bool) {
        let row = self.from.row();
        let (corner_col, step) = if kingside { (7, 1) } else { (0, -1) };

        let rook_ready = self
            .board
            .get(Coordinate::new(row, corner_col))
            .is_some_and(|rook| {
                rook.kind() == PieceKind::Rook && rook.is_color(self.color) && !rook.has_moved()
            });
        if !rook_ready {
            return;
        }

        let mut between = self.from.offset(0, step);
        while between.is_valid() && between.col() != corner_col {
            if !self.board.is_empty_at(between) {
                return;
            }
            between = between.offset(0, step);
        }

        if self.options.contains(self.from.offset(0, step)) {
            self.offer(self.from.offset(0, 2 * step));
        }
    }
}

/// Returns true if any piece of color `by` could capture the piece standing
/// on `target`. Empty squares are never attacked in this sense.
pub fn is_attacked(board: &Board, target: Coordinate, by: Color) -> bool {
    let Some(index) = target.index() else {
        return false;
    };
    board.pieces_of(by).any(|piece| {
        let mut scan = MoveScan::new(board, piece.coordinate(), by, Filter::Reach);
        scan.generate();
        scan.threats & (1u64 << index) != 0
    })
}

/// Returns the legal destinations of the piece standing on `at`.
///
/// Empty squares and off-board coordinates have no destinations.
pub fn move_options(board: &Board, at: Coordinate) -> Destinations {
    let Some(color) = board.get(at).and_then(|piece| piece.color()) else {
        return Destinations::new();
    };
    let mut scan = MoveScan::new(board, at, color, Filter::Legal);
    scan.generate();
    scan.options
}

/// Recomputes options and threat marks for a whole board.
///
/// Every piece of `side` gets its legal destinations stored; pieces of the
/// other color get none. Threat marks are refreshed from the reach of both
/// colors. Returns the total number of destinations available to `side`.
pub(crate) fn refresh(board: &mut Board, side: Color) -> usize {
    board.clear_options();

    let mut threats = 0u64;
    let mut found: Vec<(Coordinate, Destinations)> = Vec::with_capacity(16);

    for piece in board.squares().filter(|piece| !piece.is_empty()) {
        let Some(color) = piece.color() else {
            continue;
        };
        let filter = if color == side {
            Filter::Legal
        } else {
            Filter::Reach
        };
        let mut scan = MoveScan::new(board, piece.coordinate(), color, filter);
        scan.generate();
        threats |= scan.threats;
        if color == side {
            found.push((piece.coordinate(), scan.options));
        }
    }

    board.mark_threats(threats);
    let mut total = 0;
    for (at, options) in found {
        total += options.len();
        board.set_options_at(at, options);
    }
    total
}
