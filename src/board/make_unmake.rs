use crate::zobrist::ZOBRIST;

use super::state::HistoryEntry;
use super::{Bitboard, Color, Move, Piece, Position, Square};

impl Position {
    /// Place a piece on an empty square, updating hash and evaluation terms
    #[inline]
    pub(crate) fn put_piece(&mut self, color: Color, piece: Piece, sq: Square) {
        let bit = Bitboard::from_square(sq);
        debug_assert!((self.occupied() & bit).is_empty(), "{sq} already occupied");
        self.colors[color.index()] |= bit;
        self.pieces[piece.index()] |= bit;
        self.hash ^= ZOBRIST.piece(color, piece, sq);
        self.add_piece_terms(color, piece, sq);
    }

    #[inline]
    pub(crate) fn remove_piece(&mut self, color: Color, piece: Piece, sq: Square) {
        let bit = Bitboard::from_square(sq);
        debug_assert!(self.pieces_of(color, piece).contains(sq), "no {piece:?} on {sq}");
        self.colors[color.index()] ^= bit;
        self.pieces[piece.index()] ^= bit;
        self.hash ^= ZOBRIST.piece(color, piece, sq);
        self.sub_piece_terms(color, piece, sq);
    }

    #[inline]
    pub(crate) fn move_piece(&mut self, color: Color, piece: Piece, from: Square, to: Square) {
        self.remove_piece(color, piece, from);
        self.put_piece(color, piece, to);
    }

    /// Play a legal move for the side to move.
    ///
    /// The move must come from the generator (or match one of its moves by
    /// identity); the moving and captured pieces are read from the board.
    pub fn apply(&mut self, mv: Move) {
        let us = self.side_to_move;
        let them = !us;
        let from = mv.from();
        let to = mv.to();
        let Some(piece) = self.piece_on(from) else {
            panic!("apply {mv}: no piece on {from}");
        };
        let captured = if mv.is_en_passant() {
            Some(Piece::Pawn)
        } else {
            self.piece_on(to)
        };

        self.history.push(HistoryEntry {
            mv,
            captured,
            castling: self.castling,
            en_passant: self.en_passant,
            hash: self.hash,
            halfmove_clock: self.halfmove_clock,
            null: false,
        });

        if let Some(ep) = self.en_passant.take() {
            self.hash ^= ZOBRIST.en_passant(ep);
        }

        if let Some(side) = mv.castle_side() {
            let (king_from, king_to, rook_from, rook_to) = side.squares(us);
            self.move_piece(us, Piece::King, king_from, king_to);
            self.move_piece(us, Piece::Rook, rook_from, rook_to);
        } else if mv.is_en_passant() {
            let victim = to.offset(-us.pawn_push());
            self.remove_piece(them, Piece::Pawn, victim);
            self.move_piece(us, Piece::Pawn, from, to);
        } else {
            if let Some(cap) = captured {
                self.remove_piece(them, cap, to);
            }
            match mv.promotion_piece() {
                Some(promo) => {
                    self.remove_piece(us, Piece::Pawn, from);
                    self.put_piece(us, promo, to);
                }
                None => self.move_piece(us, piece, from, to),
            }
        }

        let rights = self.castling.after_move(from, to);
        if rights != self.castling {
            self.hash ^= ZOBRIST.castling(self.castling.bits()) ^ ZOBRIST.castling(rights.bits());
            self.castling = rights;
        }

        if piece == Piece::Pawn && from.index().abs_diff(to.index()) == 16 {
            let target = from.offset(us.pawn_push());
            self.en_passant = Some(target);
            self.hash ^= ZOBRIST.en_passant(target);
        }

        if piece == Piece::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if us == Color::Black {
            self.fullmove_number += 1;
        }

        self.side_to_move = them;
        self.hash ^= ZOBRIST.side();
    }

    /// Take back the last move applied with [`Position::apply`].
    ///
    /// # Panics
    ///
    /// Panics if the history is empty or the last entry is a null move.
    pub fn undo(&mut self) {
        let Some(entry) = self.history.pop() else {
            panic!("undo called with an empty move history");
        };
        assert!(!entry.null, "undo called on a null move, use undo_null");

        let us = !self.side_to_move;
        let them = self.side_to_move;
        let mv = entry.mv;
        let from = mv.from();
        let to = mv.to();

        if let Some(side) = mv.castle_side() {
            let (king_from, king_to, rook_from, rook_to) = side.squares(us);
            self.move_piece(us, Piece::Rook, rook_to, rook_from);
            self.move_piece(us, Piece::King, king_to, king_from);
        } else if mv.is_en_passant() {
            self.move_piece(us, Piece::Pawn, to, from);
            self.put_piece(them, Piece::Pawn, to.offset(-us.pawn_push()));
        } else {
            match mv.promotion_piece() {
                Some(promo) => {
                    self.remove_piece(us, promo, to);
                    self.put_piece(us, Piece::Pawn, from);
                }
                None => {
                    let Some(piece) = self.piece_on(to) else {
                        panic!("undo {mv}: no piece on {to}");
                    };
                    self.move_piece(us, piece, to, from);
                }
            }
            if let Some(cap) = entry.captured {
                self.put_piece(them, cap, to);
            }
        }

        if us == Color::Black {
            self.fullmove_number -= 1;
        }
        self.side_to_move = us;
        self.castling = entry.castling;
        self.en_passant = entry.en_passant;
        self.halfmove_clock = entry.halfmove_clock;
        self.hash = entry.hash;
    }

    /// Pass the turn without moving. Not legal while in check.
    pub fn apply_null(&mut self) {
        debug_assert!(!self.in_check(), "null move while in check");
        self.history.push(HistoryEntry {
            mv: Move::NULL,
            captured: None,
            castling: self.castling,
            en_passant: self.en_passant,
            hash: self.hash,
            halfmove_clock: self.halfmove_clock,
            null: true,
        });
        if let Some(ep) = self.en_passant.take() {
            self.hash ^= ZOBRIST.en_passant(ep);
        }
        self.halfmove_clock += 1;
        self.side_to_move = !self.side_to_move;
        self.hash ^= ZOBRIST.side();
    }

    /// # Panics
    ///
    /// Panics if the last history entry is not a null move.
    pub fn undo_null(&mut self) {
        let Some(entry) = self.history.pop() else {
            panic!("undo_null called with an empty move history");
        };
        assert!(entry.null, "undo_null called on a real move, use undo");
        self.side_to_move = !self.side_to_move;
        self.en_passant = entry.en_passant;
        self.halfmove_clock = entry.halfmove_clock;
        self.hash = entry.hash;
    }

    /// Undo moves (real or null) until the history holds `len` entries
    pub fn unwind_to(&mut self, len: usize) {
        while self.history.len() > len {
            match self.history.last() {
                Some(entry) if entry.null => self.undo_null(),
                _ => self.undo(),
            }
        }
    }

    /// Hash computed from scratch
    #[must_use]
    pub fn compute_hash(&self) -> u64 {
        let mut hash = 0;
        for color in Color::BOTH {
            for piece in Piece::ALL {
                for sq in self.pieces_of(color, piece) {
                    hash ^= ZOBRIST.piece(color, piece, sq);
                }
            }
        }
        if self.side_to_move == Color::Black {
            hash ^= ZOBRIST.side();
        }
        hash ^= ZOBRIST.castling(self.castling.bits());
        if let Some(ep) = self.en_passant {
            hash ^= ZOBRIST.en_passant(ep);
        }
        hash
    }

    /// Rebuild the incremental evaluation terms from the bitboards
    pub(crate) fn refresh_eval_terms(&mut self) {
        self.material = [0; 2];
        self.psq_mg = [0; 2];
        self.psq_eg = [0; 2];
        self.phase = [0; 2];
        for color in Color::BOTH {
            for piece in Piece::ALL {
                for sq in self.pieces_of(color, piece) {
                    self.add_piece_terms(color, piece, sq);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_move_round_trip() {
        let mut pos: Position = "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2"
            .parse()
            .expect("valid fen");
        let before = pos.clone();
        pos.apply_null();
        assert_eq!(pos.side_to_move(), Color::Black);
        assert_eq!(pos.en_passant(), None);
        assert_eq!(pos.hash(), pos.compute_hash());
        pos.undo_null();
        assert_eq!(pos.hash(), before.hash());
        assert_eq!(pos.en_passant(), before.en_passant());
        assert_eq!(pos.halfmove_clock(), before.halfmove_clock());
    }

    #[test]
    #[should_panic(expected = "empty move history")]
    fn undo_on_empty_history_panics() {
        let mut pos = Position::startpos();
        pos.undo();
    }

    #[test]
    fn unwind_mixes_null_and_real_moves() {
        let mut pos = Position::startpos();
        let start = pos.clone();
        pos.apply_uci("e2e4").expect("legal");
        pos.apply_null();
        pos.apply_uci("d2d4").expect("legal");
        pos.unwind_to(0);
        assert_eq!(pos.hash(), start.hash());
        assert_eq!(pos.occupied(), start.occupied());
        assert_eq!(pos.fullmove_number(), 1);
    }
}
