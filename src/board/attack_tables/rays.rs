//! Square-pair ray masks used by check and pin handling.

use once_cell::sync::Lazy;

use crate::board::types::Bitboard;

use super::magic::{ray_attacks, BISHOP_DIRS, ROOK_DIRS};

const ALL_DIRS: [(i32, i32); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

pub(super) struct RayTables {
    /// Strictly between `a` and `b`, plus `b` itself
    pub(super) between: Vec<[Bitboard; 64]>,
    /// Full edge-to-edge line through aligned `a` and `b`, empty otherwise
    pub(super) line: Vec<[Bitboard; 64]>,
}

fn build() -> RayTables {
    let mut between = vec![[Bitboard::EMPTY; 64]; 64];
    let mut line = vec![[Bitboard::EMPTY; 64]; 64];

    for a in 0..64usize {
        for b in 0..64usize {
            between[a][b] = Bitboard(1u64 << b);
        }
        let rank = (a / 8) as i32;
        let file = (a % 8) as i32;
        for &(dr, df) in &ALL_DIRS {
            let dirs = if dr == 0 || df == 0 { &ROOK_DIRS } else { &BISHOP_DIRS };
            let mut path = 0u64;
            let (mut r, mut f) = (rank + dr, file + df);
            while (0..8).contains(&r) && (0..8).contains(&f) {
                let b = (r * 8 + f) as usize;
                between[a][b] = Bitboard(path | 1u64 << b);
                // Intersecting both squares' empty-board rays leaves just the shared line
                let full = ray_attacks(a, 0, dirs) & ray_attacks(b, 0, dirs);
                line[a][b] = full | Bitboard(1u64 << a | 1u64 << b);
                path |= 1u64 << b;
                r += dr;
                f += df;
            }
        }
    }

    RayTables { between, line }
}

pub(super) static RAYS: Lazy<RayTables> = Lazy::new(build);
