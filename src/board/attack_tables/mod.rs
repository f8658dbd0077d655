//! Attack tables for move generation.
//!
//! Leapers (king, knight, pawn) use per-square masks. Sliders use magic
//! bitboards. All tables are immutable after first use; call [`init`] to build
//! them up front instead of on the first lookup.

mod leapers;
mod magic;
mod rays;

use crate::board::types::{Bitboard, Color, Square};

use leapers::{KING_ATTACKS, KNIGHT_ATTACKS, PAWN_ATTACKS};
use magic::{BISHOP_TABLE, ROOK_TABLE};
use rays::RAYS;

/// Force construction of every table.
pub fn init() {
    once_cell::sync::Lazy::force(&KING_ATTACKS);
    once_cell::sync::Lazy::force(&KNIGHT_ATTACKS);
    once_cell::sync::Lazy::force(&PAWN_ATTACKS);
    once_cell::sync::Lazy::force(&ROOK_TABLE);
    once_cell::sync::Lazy::force(&BISHOP_TABLE);
    once_cell::sync::Lazy::force(&RAYS);
}

#[inline]
#[must_use]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq.index()]
}

#[inline]
#[must_use]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq.index()]
}

/// Squares attacked by a pawn of `color` standing on `sq`
#[inline]
#[must_use]
pub fn pawn_attacks(color: Color, sq: Square) -> Bitboard {
    PAWN_ATTACKS[color.index()][sq.index()]
}

#[inline]
#[must_use]
pub fn rook_attacks(sq: Square, occupancy: Bitboard) -> Bitboard {
    ROOK_TABLE.attacks(sq.index(), occupancy.0)
}

#[inline]
#[must_use]
pub fn bishop_attacks(sq: Square, occupancy: Bitboard) -> Bitboard {
    BISHOP_TABLE.attacks(sq.index(), occupancy.0)
}

#[inline]
#[must_use]
pub fn queen_attacks(sq: Square, occupancy: Bitboard) -> Bitboard {
    rook_attacks(sq, occupancy) | bishop_attacks(sq, occupancy)
}

/// Rook reach that only appears once the first layer of `blockers` is removed.
///
/// Used for pin detection: with `blockers` = own pieces, an enemy rook or
/// queen in the result pins the piece standing between it and `sq`.
#[inline]
#[must_use]
pub fn xray_rook_attacks(sq: Square, occupancy: Bitboard, blockers: Bitboard) -> Bitboard {
    let direct = rook_attacks(sq, occupancy);
    let removed = blockers & direct;
    direct ^ rook_attacks(sq, occupancy ^ removed)
}

/// Diagonal counterpart of [`xray_rook_attacks`]
#[inline]
#[must_use]
pub fn xray_bishop_attacks(sq: Square, occupancy: Bitboard, blockers: Bitboard) -> Bitboard {
    let direct = bishop_attacks(sq, occupancy);
    let removed = blockers & direct;
    direct ^ bishop_attacks(sq, occupancy ^ removed)
}

/// Squares strictly between `from` and `to`, plus `to`.
///
/// For squares that do not share a rank, file or diagonal this is just `to`,
/// which makes it directly usable as the check block mask for any checker.
#[inline]
#[must_use]
pub fn between(from: Square, to: Square) -> Bitboard {
    RAYS.between[from.index()][to.index()]
}

/// The whole line through two aligned squares, or empty if unaligned
#[inline]
#[must_use]
pub fn line(a: Square, b: Square) -> Bitboard {
    RAYS.line[a.index()][b.index()]
}
