//! Castling rights type.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::piece::Color;
use super::square::Square;

pub(crate) const CASTLE_WHITE_K: u8 = 1 << 0;
pub(crate) const CASTLE_WHITE_Q: u8 = 1 << 1;
pub(crate) const CASTLE_BLACK_K: u8 = 1 << 2;
pub(crate) const CASTLE_BLACK_Q: u8 = 1 << 3;

const ALL_CASTLING_RIGHTS: u8 = CASTLE_WHITE_K | CASTLE_WHITE_Q | CASTLE_BLACK_K | CASTLE_BLACK_Q;

/// Which wing a castling move goes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CastleSide {
    King,
    Queen,
}

impl CastleSide {
    /// King and rook squares for this castle: (king from, king to, rook from, rook to)
    #[must_use]
    pub(crate) const fn squares(self, color: Color) -> (Square, Square, Square, Square) {
        match (color, self) {
            (Color::White, CastleSide::King) => (Square::E1, Square::G1, Square::H1, Square::F1),
            (Color::White, CastleSide::Queen) => (Square::E1, Square::C1, Square::A1, Square::D1),
            (Color::Black, CastleSide::King) => (Square::E8, Square::G8, Square::H8, Square::F8),
            (Color::Black, CastleSide::Queen) => (Square::E8, Square::C8, Square::A8, Square::D8),
        }
    }
}

/// Castling rights represented as a four-bit mask
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CastlingRights(u8);

impl CastlingRights {
    #[must_use]
    pub const fn none() -> Self {
        CastlingRights(0)
    }

    #[must_use]
    pub const fn all() -> Self {
        CastlingRights(ALL_CASTLING_RIGHTS)
    }

    #[inline]
    #[must_use]
    pub const fn has(self, color: Color, side: CastleSide) -> bool {
        self.0 & Self::bit_for(color, side) != 0
    }

    #[inline]
    pub fn set(&mut self, color: Color, side: CastleSide) {
        self.0 |= Self::bit_for(color, side);
    }

    /// Rights remaining after a move touching `from` and `to`
    #[inline]
    #[must_use]
    pub(crate) const fn after_move(self, from: Square, to: Square) -> Self {
        CastlingRights(self.0 & !(touch_mask(from) | touch_mask(to)))
    }

    /// Raw bitmask (index into the Zobrist castling keys)
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    const fn bit_for(color: Color, side: CastleSide) -> u8 {
        match (color, side) {
            (Color::White, CastleSide::King) => CASTLE_WHITE_K,
            (Color::White, CastleSide::Queen) => CASTLE_WHITE_Q,
            (Color::Black, CastleSide::King) => CASTLE_BLACK_K,
            (Color::Black, CastleSide::Queen) => CASTLE_BLACK_Q,
        }
    }
}

/// Rights lost when a piece leaves or lands on `sq`
#[inline]
const fn touch_mask(sq: Square) -> u8 {
    match sq.index() {
        0 => CASTLE_WHITE_Q,
        4 => CASTLE_WHITE_K | CASTLE_WHITE_Q,
        7 => CASTLE_WHITE_K,
        56 => CASTLE_BLACK_Q,
        60 => CASTLE_BLACK_K | CASTLE_BLACK_Q,
        63 => CASTLE_BLACK_K,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn king_move_clears_both_sides() {
        let rights = CastlingRights::all().after_move(Square::E1, Square::E8);
        assert_eq!(rights, CastlingRights::none());
    }

    #[test]
    fn rook_capture_clears_one_side() {
        let rights = CastlingRights::all().after_move(Square::A1, Square::H8);
        assert!(!rights.has(Color::White, CastleSide::Queen));
        assert!(rights.has(Color::White, CastleSide::King));
        assert!(!rights.has(Color::Black, CastleSide::King));
        assert!(rights.has(Color::Black, CastleSide::Queen));
    }
}
