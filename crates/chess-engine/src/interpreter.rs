//! Two-phase click interpretation.
//!
//! A move is entered as two selections: first a square holding a piece of the
//! side to move, then one of that piece's destinations. Anything else either
//! reselects or drops back to idle.

use crate::board::Board;
use chess_core::{Color, Coordinate};

/// Interpreter state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Idle,
    /// A piece of the side to move has been picked up.
    PieceSelected(Coordinate),
}

/// Converts a sequence of selected squares into moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveInterpreter {
    selection: Selection,
}

impl MoveInterpreter {
    pub const fn new() -> Self {
        MoveInterpreter {
            selection: Selection::Idle,
        }
    }

    #[inline]
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Returns the square of the selected piece, if any.
    #[inline]
    pub fn selected(&self) -> Option<Coordinate> {
        match self.selection {
            Selection::Idle => None,
            Selection::PieceSelected(at) => Some(at),
        }
    }

    /// Destinations of the selected piece, for highlighting.
    pub fn highlights<'b>(&self, board: &'b Board) -> &'b [Coordinate] {
        self.selected()
            .and_then(|at| board.get(at))
            .map(|piece| piece.options().as_slice())
            .unwrap_or(&[])
    }

    pub fn reset(&mut self) {
        self.selection = Selection::Idle;
    }

    /// Feeds one selected square into the interpreter.
    ///
    /// Returns `(from, to)` when the selection completes a move; the caller
    /// is responsible for applying it. Off-board squares deselect.
    pub fn interpret(
        &mut self,
        board: &Board,
        side_to_move: Color,
        at: Coordinate,
    ) -> Option<(Coordinate, Coordinate)> {
        let own_piece = board
            .get(at)
            .is_some_and(|piece| piece.is_color(side_to_move));

        match self.selection {
            Selection::Idle => {
                if own_piece {
                    self.selection = Selection::PieceSelected(at);
                }
                None
            }
            Selection::PieceSelected(from) => {
                if own_piece {
                    self.selection = Selection::PieceSelected(at);
                    return None;
                }
                self.selection = Selection::Idle;
                let legal = board
                    .get(from)
                    .is_some_and(|piece| piece.options().contains(at));
                legal.then_some((from, at))
            }
        }
    }
}
