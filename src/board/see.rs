//! Static Exchange Evaluation (SEE).
//!
//! Plays out the capture sequence on a single square, always recapturing with
//! the least valuable attacker, to decide whether a capture wins, loses or
//! breaks even.

use super::attack_tables::{bishop_attacks, rook_attacks};
use super::{Bitboard, Move, Piece, Position};

/// Longest possible exchange on one square
const MAX_EXCHANGE: usize = 32;

impl Position {
    /// Material balance in centipawns of the exchange started by `mv`, from
    /// the moving side's point of view. Positive wins material.
    ///
    /// # Panics
    ///
    /// Panics if `mv` is not a capture in this position.
    #[must_use]
    pub fn see(&self, mv: Move) -> i32 {
        let from = mv.from();
        let to = mv.to();
        let victim = if mv.is_en_passant() {
            Piece::Pawn
        } else {
            match self.piece_on(to) {
                Some(piece) => piece,
                None => panic!("see called on non-capture {mv}"),
            }
        };
        let Some(attacker) = self.piece_on(from) else {
            panic!("see called with no piece on {from}");
        };

        let mut gain = [0i32; MAX_EXCHANGE];
        let mut depth = 0;
        let mut side = self.side_to_move;
        let mut occupancy = self.occupied();
        if mv.is_en_passant() {
            occupancy ^= Bitboard::from_square(to.offset(-side.pawn_push()));
        }

        let queens = self.pieces[Piece::Queen.index()];
        let diagonal = self.pieces[Piece::Bishop.index()] | queens;
        let straight = self.pieces[Piece::Rook.index()] | queens;

        let mut attackers = self.attackers_to(to, occupancy);
        // A promoting capture puts the new piece on the square
        let promotion = mv.promotion_piece();
        gain[0] = victim.value() + promotion.map_or(0, |piece| piece.value() - Piece::Pawn.value());
        let mut on_square = promotion.unwrap_or(attacker);
        let mut from_bb = Bitboard::from_square(from);

        loop {
            occupancy ^= from_bb;
            attackers &= !from_bb;

            // Sliders lined up behind the piece that just captured join in
            if matches!(on_square, Piece::Pawn | Piece::Bishop | Piece::Queen) {
                attackers |= bishop_attacks(to, occupancy) & diagonal & occupancy;
            }
            if matches!(on_square, Piece::Rook | Piece::Queen) {
                attackers |= rook_attacks(to, occupancy) & straight & occupancy;
            }

            side = !side;
            let ours = attackers & self.colors[side.index()];
            if ours.is_empty() {
                break;
            }

            depth += 1;
            if depth >= MAX_EXCHANGE {
                break;
            }

            gain[depth] = on_square.value() - gain[depth - 1];
            if (-gain[depth - 1]).max(gain[depth]) < 0 {
                break;
            }

            let (piece, bb) = self.least_valuable(ours);
            // The king may only recapture when nothing defends the square
            if piece == Piece::King && (attackers & self.colors[(!side).index()]).is_nonempty() {
                break;
            }
            on_square = piece;
            from_bb = bb;
        }

        while depth > 0 {
            depth -= 1;
            gain[depth] = -(-gain[depth]).max(gain[depth + 1]);
        }
        gain[0]
    }

    /// Whether the exchange started by `mv` nets at least `threshold`
    #[inline]
    #[must_use]
    pub fn see_ge(&self, mv: Move, threshold: i32) -> bool {
        self.see(mv) >= threshold
    }

    /// Cheapest piece in `attackers` (all one color) as a single-square board
    fn least_valuable(&self, attackers: Bitboard) -> (Piece, Bitboard) {
        for piece in Piece::ALL {
            let candidates = attackers & self.pieces[piece.index()];
            if candidates.is_nonempty() {
                return (piece, Bitboard::from_square(candidates.lsb()));
            }
        }
        unreachable!("least_valuable called with no attackers")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn see_of(fen: &str, uci: &str) -> i32 {
        let board: Position = fen.parse().expect("valid fen");
        let mv = board.parse_uci(uci).expect("legal move");
        board.see(mv)
    }

    #[test]
    fn undefended_pawn_wins_a_pawn() {
        assert_eq!(see_of("k7/8/8/3p4/4P3/8/8/7K w - - 0 1", "e4d5"), 100);
        assert_eq!(see_of("1k1r4/1pp4p/p7/4p3/8/P5P1/1PP4P/2K1R3 w - - 0 1", "e1e5"), 100);
    }

    #[test]
    fn pawn_trade_is_even() {
        assert_eq!(see_of("k7/8/2p5/3p4/4P3/8/8/7K w - - 0 1", "e4d5"), 0);
    }

    #[test]
    fn piece_takes_defended_pawn_loses() {
        assert_eq!(see_of("k7/8/2p5/3p4/5N2/8/8/7K w - - 0 1", "f4d5"), 100 - 320);
        assert_eq!(see_of("k7/8/2p5/3p4/4Q3/8/8/7K w - - 0 1", "e4d5"), 100 - 900);
    }

    #[test]
    fn xray_rook_supports_the_capture() {
        // Rd2xd5 Rxd5 Rxd5: the second rook stands behind the first
        assert_eq!(see_of("3r3k/8/8/3p4/8/8/3R4/3R3K w - - 0 1", "d2d5"), 100);
        // Without the back rook the capture loses the exchange
        assert_eq!(see_of("3r3k/8/8/3p4/8/8/3R4/7K w - - 0 1", "d2d5"), 100 - 500);
    }

    #[test]
    fn en_passant_counts_as_pawn_capture() {
        assert_eq!(see_of("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1", "e5d6"), 100);
    }

    #[test]
    fn capture_promotion_counts_the_new_piece() {
        // Nothing defends b8
        assert_eq!(see_of("1r5k/P7/8/8/8/8/8/7K w - - 0 1", "a7b8q"), 500 + 800);
        assert_eq!(see_of("1r5k/P7/8/8/8/8/8/7K w - - 0 1", "a7b8n"), 500 + 220);
        // The king takes the new queen back
        assert_eq!(see_of("1rk5/P7/8/8/8/8/8/7K w - - 0 1", "a7b8q"), 500 + 800 - 900);
        // The king takes the new knight back
        assert_eq!(see_of("1rk5/P7/8/8/8/8/8/7K w - - 0 1", "a7b8n"), 500 + 220 - 320);
    }

    #[test]
    #[should_panic(expected = "non-capture")]
    fn quiet_move_panics() {
        let board = Position::startpos();
        let mv = board.parse_uci("e2e4").expect("legal");
        let _ = board.see(mv);
    }
}
