//! Chess rules engine with a notification-driven legality pass.
//!
//! This crate provides:
//! - [`Board`] and [`Piece`] - a fully populated 8x8 grid, empty squares held
//!   by a sentinel piece
//! - Per-piece move generation, castling and self-check filtering
//! - [`Game`] - turn handling, promotion, checkmate, stalemate and
//!   repetition detection
//! - [`MoveInterpreter`] - two-click move entry
//! - [`Observer`] - publish/subscribe notification of state changes
//!
//! # Architecture
//!
//! Every concluded turn triggers one pass in which each piece of the side to
//! move regenerates its legal destinations and threat marks are refreshed.
//! The game then sums the destinations, decides whether the position is
//! terminal, and finally calls its subscribers back. Legality is therefore
//! always current before the next input is accepted.
//!
//! # Example
//!
//! ```
//! use chess_core::Coordinate;
//! use chess_engine::{Game, GameState};
//!
//! let mut game = Game::new();
//! assert_eq!(game.legal_move_count(), 20);
//!
//! // Select the e2 pawn, then its destination.
//! game.submit_selection(Coordinate::new(6, 4));
//! game.submit_selection(Coordinate::new(4, 4));
//! assert_eq!(game.turn(), 1);
//! assert_eq!(game.state(), GameState::Ongoing);
//! ```

mod board;
mod game;
mod interpreter;
pub mod movegen;
mod notify;
pub mod perft;
pub mod zobrist;

pub use board::{Board, Destinations, Piece};
pub use game::{Game, GameState, MoveError, PromotionError, REPETITION_LIMIT};
pub use interpreter::{MoveInterpreter, Selection};
pub use movegen::{is_attacked, move_options};
pub use notify::{Observer, SubscriptionId};
