//! Zobrist hashing keys.
//!
//! Each position feature (piece on square, side to move, castling rights set,
//! en-passant file) owns a random 64-bit key; a position's hash is the XOR of
//! the keys of the features it has, so apply/undo update it incrementally.

use once_cell::sync::Lazy;
use rand::prelude::*;

use crate::board::{Color, Piece, Square};

pub(crate) struct ZobristKeys {
    /// `pieces[color][piece][square]`
    pieces: [[[u64; 64]; 6]; 2],
    black_to_move: u64,
    /// Indexed by the full four-bit castling rights mask
    castling: [u64; 16],
    /// En-passant target file
    en_passant: [u64; 8],
}

impl ZobristKeys {
    fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(1_234_567_890);
        let mut pieces = [[[0u64; 64]; 6]; 2];
        for color in &mut pieces {
            for piece in color.iter_mut() {
                for key in piece.iter_mut() {
                    *key = rng.gen();
                }
            }
        }
        let black_to_move = rng.gen();
        let mut castling = [0u64; 16];
        // The empty rights set hashes to zero so positions without rights need no key
        for key in castling.iter_mut().skip(1) {
            *key = rng.gen();
        }
        let mut en_passant = [0u64; 8];
        for key in &mut en_passant {
            *key = rng.gen();
        }

        ZobristKeys {
            pieces,
            black_to_move,
            castling,
            en_passant,
        }
    }

    #[inline]
    pub(crate) fn piece(&self, color: Color, piece: Piece, sq: Square) -> u64 {
        self.pieces[color.index()][piece.index()][sq.index()]
    }

    #[inline]
    pub(crate) fn side(&self) -> u64 {
        self.black_to_move
    }

    #[inline]
    pub(crate) fn castling(&self, rights_bits: u8) -> u64 {
        self.castling[usize::from(rights_bits & 0xF)]
    }

    #[inline]
    pub(crate) fn en_passant(&self, sq: Square) -> u64 {
        self.en_passant[usize::from(sq.file())]
    }
}

pub(crate) static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(ZobristKeys::new);
