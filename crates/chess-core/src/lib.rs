//! Core types for chess.
//!
//! This crate provides the fundamental types used across the rules engine:
//! - [`PieceKind`] and [`Color`] for piece representation
//! - [`Coordinate`] for board squares as (row, column) pairs
//! - [`Layout`] for describing and parsing board setups

mod color;
mod coordinate;
mod kind;
mod layout;

pub use color::Color;
pub use coordinate::Coordinate;
pub use kind::{ParseKindError, PieceKind};
pub use layout::{Layout, LayoutError};
