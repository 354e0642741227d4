//! Zobrist hashing for position identification.
//!
//! A position signature is built by XORing random numbers associated with:
//! - Each piece on each square (6 kinds x 2 colors x 64 squares)
//! - Side to move
//! - Castling availability (4 values: king and corner rook unmoved)
//!
//! Two boards with the same signature are treated as the same position for
//! repetition counting.

use crate::board::Board;
use chess_core::{Color, Coordinate, PieceKind};

/// Zobrist hash keys.
///
/// Generated using a fixed seed for reproducibility.
pub struct ZobristKeys {
    /// Keys for pieces: [kind][color][square]
    pub pieces: [[[u64; 64]; 2]; 6],
    /// Key for black to move (XOR when black to move).
    pub black_to_move: u64,
    /// Keys for castling availability, indexed by [`castling_index`].
    pub castling: [u64; 4],
}

impl ZobristKeys {
    /// Initializes Zobrist keys using a simple PRNG.
    pub const fn new() -> Self {
        // Simple xorshift64 PRNG for const initialization
        const fn next_random(state: u64) -> (u64, u64) {
            let mut x = state;
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            (x, x)
        }

        let mut state = 0x9E3779B97F4A7C15u64; // Golden ratio seed
        let mut pieces = [[[0u64; 64]; 2]; 6];
        let mut castling = [0u64; 4];

        let mut kind = 0;
        while kind < 6 {
            let mut color = 0;
            while color < 2 {
                let mut square = 0;
                while square < 64 {
                    let (new_state, value) = next_random(state);
                    state = new_state;
                    pieces[kind][color][square] = value;
                    square += 1;
                }
                color += 1;
            }
            kind += 1;
        }

        let (new_state, black_to_move) = next_random(state);
        state = new_state;

        let mut i = 0;
        while i < 4 {
            let (new_state, value) = next_random(state);
            state = new_state;
            castling[i] = value;
            i += 1;
        }

        ZobristKeys {
            pieces,
            black_to_move,
            castling,
        }
    }

    /// Returns the key for a piece on a square, or 0 for the empty sentinel.
    #[inline]
    pub fn piece_key(&self, kind: PieceKind, color: Color, at: Coordinate) -> u64 {
        match (kind.is_empty(), at.index()) {
            (false, Some(index)) => self.pieces[kind.index()][color.index()][index],
            _ => 0,
        }
    }
}

/// Global Zobrist keys (initialized at compile time).
pub static ZOBRIST: ZobristKeys = ZobristKeys::new();

/// Index of a castling availability key: White then Black, queenside first.
#[inline]
pub const fn castling_index(color: Color, kingside: bool) -> usize {
    color.index() * 2 + kingside as usize
}

/// Computes the signature of a board with the given side to move.
pub fn position_key(board: &Board, side_to_move: Color) -> u64 {
    let mut key = 0u64;
    for piece in board.squares() {
        if let Some(color) = piece.color() {
            key ^= ZOBRIST.piece_key(piece.kind(), color, piece.coordinate());
        }
    }
    if side_to_move == Color::Black {
        key ^= ZOBRIST.black_to_move;
    }
    for color in Color::ALL {
        for kingside in [false, true] {
            if board.castling_available(color, kingside) {
                key ^= ZOBRIST.castling[castling_index(color, kingside)];
            }
        }
    }
    key
}
