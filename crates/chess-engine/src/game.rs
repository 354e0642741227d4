//! Full game management: turns, promotion, and terminal detection.
//!
//! The [`Game`] struct owns the board and drives every state change:
//! - Applying moves, including captures and castling
//! - Concluding turns and broadcasting notifications
//! - Suspending play while a promotion choice is pending
//! - Detecting checkmate, stalemate and threefold repetition

use crate::board::{Board, Destinations, Piece};
use crate::interpreter::MoveInterpreter;
use crate::notify::{Observer, Subscribers, SubscriptionId};
use crate::{movegen, zobrist};
use chess_core::{Color, Coordinate, Layout, LayoutError, PieceKind};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use thiserror::Error;
use tracing::{debug, info};

/// Number of occurrences of a position that ends the game in a draw.
pub const REPETITION_LIMIT: u32 = 3;

/// The game's state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameState {
    Ongoing,
    /// A pawn reached the far row and waits for its replacement kind.
    PromotionPending,
    Checkmate,
    Stalemate,
    RepetitionDraw,
}

impl GameState {
    /// Returns true once no further moves are accepted.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            GameState::Checkmate | GameState::Stalemate | GameState::RepetitionDraw
        )
    }

    /// Returns the message shown when the game is in this state.
    ///
    /// On checkmate the side to move has lost, so the winner is the other side.
    pub fn end_message(self, side_to_move: Color) -> String {
        match self {
            GameState::Checkmate => {
                format!("That's checkmate, {} wins!", side_to_move.opposite())
            }
            GameState::Stalemate => "It's a stalemate.".to_string(),
            GameState::RepetitionDraw => "It's a draw by repetition (threefold).".to_string(),
            GameState::Ongoing | GameState::PromotionPending => {
                "The game is ongoing.".to_string()
            }
        }
    }
}

impl std::fmt::Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GameState::Ongoing => "ongoing",
            GameState::PromotionPending => "promotion-pending",
            GameState::Checkmate => "checkmate",
            GameState::Stalemate => "stalemate",
            GameState::RepetitionDraw => "repetition-draw",
        };
        write!(f, "{}", name)
    }
}

/// Error type for move application.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("game has already ended")]
    GameOver,
    #[error("a promotion choice is pending")]
    PromotionPending,
    #[error("coordinate {0:?} is off the board")]
    OffBoard(Coordinate),
    #[error("no piece of the side to move on {0}")]
    NoPieceToMove(Coordinate),
    #[error("{to} is not a legal destination from {from}")]
    IllegalDestination { from: Coordinate, to: Coordinate },
}

/// Error type for promotion resolution.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PromotionError {
    #[error("no promotion is pending")]
    NotPending,
    #[error("a pawn cannot promote to {0}")]
    InvalidChoice(PieceKind),
}

/// A chess game in progress.
///
/// Legal destinations, threat marks and the legal-move count are recomputed
/// by a notification pass at construction and after every turn, before any
/// subscriber is called back.
#[derive(Debug)]
pub struct Game {
    board: Board,
    turn: u32,
    state: GameState,
    /// Destinations available to the side to move, summed over its pieces.
    legal_moves: usize,
    promotion_square: Option<Coordinate>,
    /// Occurrence counts keyed by position signature.
    repetitions: HashMap<u64, u32>,
    interpreter: MoveInterpreter,
    subscribers: Subscribers,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Game {
    /// Clones the game state. The clone starts without subscribers.
    fn clone(&self) -> Self {
        Game {
            board: self.board.clone(),
            turn: self.turn,
            state: self.state,
            legal_moves: self.legal_moves,
            promotion_square: self.promotion_square,
            repetitions: self.repetitions.clone(),
            interpreter: self.interpreter,
            subscribers: Subscribers::default(),
        }
    }
}

impl Game {
    /// Creates a new game with the standard starting position.
    pub fn new() -> Self {
        Self::from_board(Board::standard(), Color::White)
    }

    /// Creates a game from a layout string with the given side to move.
    pub fn from_layout(placement: &str, side_to_move: Color) -> Result<Self, LayoutError> {
        let layout = Layout::parse(placement)?;
        Ok(Self::from_board(Board::from_layout(&layout), side_to_move))
    }

    /// Creates a game from a prepared board.
    ///
    /// The position may already be terminal (for example a stalemate layout).
    pub fn from_board(board: Board, side_to_move: Color) -> Self {
        let mut game = Game {
            board,
            turn: side_to_move.index() as u32,
            state: GameState::Ongoing,
            legal_moves: 0,
            promotion_square: None,
            repetitions: HashMap::new(),
            interpreter: MoveInterpreter::new(),
            subscribers: Subscribers::default(),
        };
        game.board.clear_threats();
        game.recompute();
        game.evaluate_position();
        game.notify();
        game
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the number of turns concluded so far (counted from 0 for a
    /// White-to-move start).
    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn side_to_move(&self) -> Color {
        Color::for_turn(self.turn)
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_terminal()
    }

    /// Number of destinations available to the side to move.
    pub fn legal_move_count(&self) -> usize {
        self.legal_moves
    }

    /// Returns true if the king of the side to move is threatened.
    pub fn is_check(&self) -> bool {
        self.board
            .king_of(self.side_to_move())
            .is_some_and(Piece::is_threatened)
    }

    /// Returns the legal destinations of the piece on `at`.
    ///
    /// Only pieces of the side to move have destinations.
    pub fn options_at(&self, at: Coordinate) -> Destinations {
        self.board
            .get(at)
            .map(|piece| *piece.options())
            .unwrap_or_default()
    }

    /// Returns every legal `(from, to)` pair for the side to move.
    pub fn legal_moves(&self) -> Vec<(Coordinate, Coordinate)> {
        self.board
            .pieces_of(self.side_to_move())
            .flat_map(|piece| {
                let from = piece.coordinate();
                piece.options().as_slice().iter().map(move |&to| (from, to))
            })
            .collect()
    }

    /// Returns how many times the current position has occurred.
    pub fn position_count(&self) -> u32 {
        let key = zobrist::position_key(&self.board, self.side_to_move());
        self.repetitions.get(&key).copied().unwrap_or(0)
    }

    /// Returns the click interpreter (current selection and highlights).
    pub fn interpreter(&self) -> &MoveInterpreter {
        &self.interpreter
    }

    /// Returns the square of the pawn awaiting promotion, if any.
    pub fn promotion_square(&self) -> Option<Coordinate> {
        self.promotion_square
    }

    /// Registers an observer. The game holds it weakly; dropping the last
    /// strong reference unsubscribes it.
    pub fn subscribe<O: Observer + 'static>(&mut self, observer: &Rc<RefCell<O>>) -> SubscriptionId {
        let weak = Rc::downgrade(observer);
        let weak: Weak<RefCell<dyn Observer>> = weak;
        self.subscribers.subscribe(weak)
    }

    /// Removes a subscription. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Feeds one clicked square into the move interpreter.
    ///
    /// Input mistakes are absorbed: the interpreter either ignores the square,
    /// reselects, or drops the selection.
    pub fn submit_selection(&mut self, at: Coordinate) {
        if self.state != GameState::Ongoing {
            debug!(%at, state = %self.state, "selection ignored");
            self.interpreter.reset();
            return;
        }
        if !at.is_valid() {
            debug!(?at, "off-board selection");
            self.interpreter.reset();
            return;
        }

        let mut interpreter = self.interpreter;
        let decision = interpreter.interpret(&self.board, self.side_to_move(), at);
        self.interpreter = interpreter;
        debug!(%at, selection = ?self.interpreter.selection(), "selection");

        if let Some((from, to)) = decision {
            if let Err(e) = self.apply_move(from, to) {
                debug!(error = %e, "move discarded");
            }
        }
    }

    /// Feeds a promotion decision by kind name ("Bishop", "Knight", "Rook"
    /// or "Queen"). Anything else, or a submission while no promotion is
    /// pending, is ignored.
    pub fn submit_promotion_choice(&mut self, name: &str) {
        let kind = match name.parse::<PieceKind>() {
            Ok(kind) => kind,
            Err(e) => {
                debug!(error = %e, "promotion choice ignored");
                return;
            }
        };
        if let Err(e) = self.resolve_promotion(kind) {
            debug!(error = %e, "promotion choice ignored");
        }
    }

    /// Moves the side to move's piece on `from` to `to`.
    ///
    /// Captures whatever stands on `to`, concludes the turn, and suspends the
    /// game in [`GameState::PromotionPending`] if a pawn reached the far row.
    pub fn apply_move(&mut self, from: Coordinate, to: Coordinate) -> Result<(), MoveError> {
        match self.state {
            GameState::Ongoing => {}
            GameState::PromotionPending => return Err(MoveError::PromotionPending),
            _ => return Err(MoveError::GameOver),
        }
        for c in [from, to] {
            if !c.is_valid() {
                return Err(MoveError::OffBoard(c));
            }
        }

        let Some(piece) = self
            .board
            .get(from)
            .filter(|piece| piece.is_color(self.side_to_move()))
            .copied()
        else {
            return Err(MoveError::NoPieceToMove(from));
        };
        if !piece.options().contains(to) {
            return Err(MoveError::IllegalDestination { from, to });
        }

        if let Some(captured) = self.board.clear_square(to).filter(|p| !p.is_empty()) {
            debug!(square = %to, kind = %captured.kind(), "capture");
        }
        self.board.move_to(from, to);
        self.interpreter.reset();
        debug!(turn = self.turn, %from, %to, kind = %piece.kind(), "move applied");

        let reached_far_row = piece
            .color()
            .is_some_and(|color| to.row() == color.promotion_row());
        if piece.kind() == PieceKind::Pawn && reached_far_row {
            self.state = GameState::PromotionPending;
            self.promotion_square = Some(to);
            info!(square = %to, "promotion pending");
        }

        self.conclude_turn();
        Ok(())
    }

    /// Replaces the pawn awaiting promotion with a piece of the chosen kind
    /// and resumes play.
    pub fn resolve_promotion(&mut self, kind: PieceKind) -> Result<(), PromotionError> {
        if self.state != GameState::PromotionPending {
            return Err(PromotionError::NotPending);
        }
        if !kind.is_promotion_choice() {
            return Err(PromotionError::InvalidChoice(kind));
        }
        let Some(at) = self.promotion_square.take() else {
            return Err(PromotionError::NotPending);
        };

        let color = self
            .board
            .get(at)
            .and_then(Piece::color)
            .unwrap_or_else(|| self.side_to_move().opposite());
        self.board.clear_square(at);
        self.board
            .place(Piece::new(kind, color, at).with_moved(true));
        self.state = GameState::Ongoing;
        info!(square = %at, %kind, "promotion resolved");

        self.board.clear_threats();
        self.recompute();
        self.evaluate_position();
        self.notify();
        Ok(())
    }

    /// Advances the turn counter, clears threat marks, recomputes legality
    /// for the new side to move and evaluates terminal conditions, then
    /// notifies subscribers. While a promotion is pending, evaluation waits
    /// for the choice.
    fn conclude_turn(&mut self) {
        self.turn += 1;
        self.board.clear_threats();
        self.recompute();
        if self.state == GameState::Ongoing {
            self.evaluate_position();
        }
        self.notify();
    }

    /// Legality pass: every piece of the side to move regenerates its
    /// destinations and the threat marks are refreshed.
    fn recompute(&mut self) {
        let side = self.side_to_move();
        self.legal_moves = movegen::refresh(&mut self.board, side);
    }

    /// Calls every live subscriber in subscription order.
    fn notify(&mut self) {
        for observer in self.subscribers.live() {
            match observer.try_borrow_mut() {
                Ok(mut observer) => observer.update(self),
                Err(_) => debug!("observer busy, notification skipped"),
            }
        }
    }

    /// Records the position and checks for checkmate, stalemate and
    /// repetition.
    fn evaluate_position(&mut self) {
        let key = zobrist::position_key(&self.board, self.side_to_move());
        let count = self.repetitions.entry(key).or_insert(0);
        *count += 1;
        let occurrences = *count;

        let next = if self.legal_moves == 0 {
            if self.is_check() {
                GameState::Checkmate
            } else {
                GameState::Stalemate
            }
        } else if occurrences >= REPETITION_LIMIT {
            GameState::RepetitionDraw
        } else {
            return;
        };

        self.state = next;
        self.interpreter.reset();
        info!(state = %next, side_to_move = %self.side_to_move(), "game over");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(row: i8, col: i8) -> Coordinate {
        Coordinate::new(row, col)
    }

    #[test]
    fn new_game() {
        let game = Game::new();
        assert_eq!(game.state(), GameState::Ongoing);
        assert_eq!(game.turn(), 0);
        assert_eq!(game.side_to_move(), Color::White);
        assert_eq!(game.legal_move_count(), 20);
        assert_eq!(game.position_count(), 1);
        assert!(!game.is_check());
    }

    #[test]
    fn pawn_double_step() {
        let mut game = Game::new();
        game.apply_move(at(6, 4), at(4, 4)).unwrap();
        assert_eq!(game.turn(), 1);
        assert_eq!(game.side_to_move(), Color::Black);
        assert_eq!(game.board().get(at(4, 4)).unwrap().kind(), PieceKind::Pawn);
        assert!(game.board().is_empty_at(at(6, 4)));
        assert_eq!(game.legal_move_count(), 20);
    }

    #[test]
    fn rejected_moves_leave_state_untouched() {
        let mut game = Game::new();
        assert_eq!(
            game.apply_move(at(6, 4), at(3, 4)),
            Err(MoveError::IllegalDestination {
                from: at(6, 4),
                to: at(3, 4)
            })
        );
        assert_eq!(
            game.apply_move(at(1, 4), at(3, 4)),
            Err(MoveError::NoPieceToMove(at(1, 4)))
        );
        assert_eq!(
            game.apply_move(at(6, 4), at(-2, 4)),
            Err(MoveError::OffBoard(at(-2, 4)))
        );
        assert_eq!(game.turn(), 0);
    }

    #[test]
    fn options_only_for_side_to_move() {
        let game = Game::new();
        assert_eq!(game.options_at(at(7, 6)).len(), 2);
        assert!(game.options_at(at(0, 6)).is_empty());
        assert!(game.options_at(at(4, 4)).is_empty());
        assert_eq!(game.legal_moves().len(), 20);
    }

    #[test]
    fn pawn_capture() {
        let mut game = Game::new();
        game.apply_move(at(6, 4), at(4, 4)).unwrap();
        game.apply_move(at(1, 3), at(3, 3)).unwrap();
        game.apply_move(at(4, 4), at(3, 3)).unwrap();

        let piece = game.board().get(at(3, 3)).unwrap();
        assert_eq!(piece.kind(), PieceKind::Pawn);
        assert!(piece.is_color(Color::White));
        assert_eq!(game.board().pieces_of(Color::Black).count(), 15);
    }

    #[test]
    fn promotion_on_ongoing_game_is_noop() {
        let mut game = Game::new();
        assert_eq!(
            game.resolve_promotion(PieceKind::Queen),
            Err(PromotionError::NotPending)
        );
        game.submit_promotion_choice("Queen");
        assert_eq!(game.state(), GameState::Ongoing);
        assert_eq!(game.turn(), 0);
    }

    #[test]
    fn end_messages() {
        assert_eq!(
            GameState::Checkmate.end_message(Color::White),
            "That's checkmate, Black wins!"
        );
        assert_eq!(
            GameState::Checkmate.end_message(Color::Black),
            "That's checkmate, White wins!"
        );
        assert_eq!(
            GameState::Stalemate.end_message(Color::White),
            "It's a stalemate."
        );
        assert_eq!(
            GameState::RepetitionDraw.end_message(Color::Black),
            "It's a draw by repetition (threefold)."
        );
        assert_eq!(
            GameState::Ongoing.end_message(Color::White),
            "The game is ongoing."
        );
    }

    #[test]
    fn state_display() {
        assert_eq!(GameState::PromotionPending.to_string(), "promotion-pending");
        assert_eq!(GameState::RepetitionDraw.to_string(), "repetition-draw");
        assert!(GameState::Checkmate.is_terminal());
        assert!(!GameState::PromotionPending.is_terminal());
    }

    #[test]
    fn clone_drops_subscribers() {
        struct Nop;
        impl Observer for Nop {
            fn update(&mut self, _game: &Game) {}
        }

        let observer = Rc::new(RefCell::new(Nop));
        let mut game = Game::new();
        let id = game.subscribe(&observer);
        let mut copy = game.clone();
        assert!(!copy.unsubscribe(id));
        assert!(game.unsubscribe(id));
    }
}
