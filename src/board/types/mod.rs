//! Core chess types.
//!
//! - `Piece` and `Color` - piece types and side colors
//! - `Square` - compact board square (index 0-63)
//! - `Bitboard` - 64-bit square set
//! - `Move` and `MoveList` - packed move and fixed-capacity list
//! - `CastlingRights` and `CastleSide` - castling state

mod bitboard;
mod castling;
mod moves;
mod piece;
mod square;

pub use bitboard::{Bitboard, BitboardIter};
pub use castling::{CastleSide, CastlingRights};
pub use moves::{Move, MoveKind, MoveList, MAX_PLY};
pub use piece::{Color, Piece};
pub use square::Square;

pub(crate) use piece::PROMOTION_PIECES;
