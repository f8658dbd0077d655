//! Precomputed attack tables for leaper pieces (knights, kings, pawns).

use once_cell::sync::Lazy;

use crate::board::types::Bitboard;

const KNIGHT_DELTAS: [(i32, i32); 8] = [
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
];

const KING_DELTAS: [(i32, i32); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Mask of every on-board square reached from `sq` by one of `deltas`
fn leaper_mask(sq: usize, deltas: &[(i32, i32)]) -> Bitboard {
    let r = (sq / 8) as i32;
    let f = (sq % 8) as i32;
    let mut mask = 0u64;
    for &(dr, df) in deltas {
        let nr = r + dr;
        let nf = f + df;
        if (0..8).contains(&nr) && (0..8).contains(&nf) {
            mask |= 1u64 << (nr * 8 + nf);
        }
    }
    Bitboard(mask)
}

pub(super) static KNIGHT_ATTACKS: Lazy<[Bitboard; 64]> =
    Lazy::new(|| std::array::from_fn(|sq| leaper_mask(sq, &KNIGHT_DELTAS)));

pub(super) static KING_ATTACKS: Lazy<[Bitboard; 64]> =
    Lazy::new(|| std::array::from_fn(|sq| leaper_mask(sq, &KING_DELTAS)));

/// `PAWN_ATTACKS[color][sq]`: squares a pawn of `color` on `sq` attacks
pub(super) static PAWN_ATTACKS: Lazy<[[Bitboard; 64]; 2]> = Lazy::new(|| {
    [
        std::array::from_fn(|sq| leaper_mask(sq, &[(1, -1), (1, 1)])),
        std::array::from_fn(|sq| leaper_mask(sq, &[(-1, -1), (-1, 1)])),
    ]
});
