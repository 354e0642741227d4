//! Perft (performance test) for move generator validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values to validate the move generator.
//! A move that ends in a pending promotion branches once per promotion
//! choice, as in standard perft tables.

use crate::{Game, GameState};
use chess_core::PieceKind;

/// Counts the number of leaf nodes at the given depth.
pub fn perft(game: &Game, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut nodes = 0u64;
    for (from, to) in game.legal_moves() {
        let mut next = game.clone();
        if next.apply_move(from, to).is_err() {
            continue;
        }
        nodes += expand(next, depth);
    }
    nodes
}

/// Perft with divide - shows node count for each move at depth-1.
/// Useful for debugging to identify which moves have incorrect counts.
pub fn perft_divide(game: &Game, depth: u32) -> Vec<(String, u64)> {
    let mut results = Vec::new();

    for (from, to) in game.legal_moves() {
        let mut next = game.clone();
        if next.apply_move(from, to).is_err() {
            continue;
        }
        results.push((format!("{}{}", from, to), expand(next, depth.max(1))));
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}

/// Counts the leaves under a position reached by one move.
fn expand(next: Game, depth: u32) -> u64 {
    if next.state() != GameState::PromotionPending {
        return perft(&next, depth - 1);
    }
    PieceKind::PROMOTION_CHOICES
        .iter()
        .map(|&kind| {
            let mut promoted = next.clone();
            match promoted.resolve_promotion(kind) {
                Ok(()) => perft(&promoted, depth - 1),
                Err(_) => 0,
            }
        })
        .sum()
}
