use super::super::attack_tables::{between, king_attacks};
use super::super::{Bitboard, CastleSide, Move, MoveList, Piece, Position};
use super::{Constraints, GenMode};

impl Position {
    /// King steps onto squares that stay unattacked with the king lifted off the
    /// board, so a slider cannot be escaped by stepping along its own ray.
    pub(crate) fn king_moves(&self, ctx: &Constraints, mode: GenMode, moves: &mut MoveList) {
        let occupied = ctx.occupied ^ Bitboard::from_square(ctx.king);
        for to in king_attacks(ctx.king) & ctx.targets(mode) {
            if !self.is_attacked(to, ctx.them, occupied) {
                moves.push(Move::normal(ctx.king, to, Piece::King, self.captured_on(ctx, to)));
            }
        }
    }

    /// Castling: the right is held, the squares between king and rook are
    /// empty, and the king neither starts, passes nor lands on an attacked square.
    pub(crate) fn castling_moves(&self, ctx: &Constraints, moves: &mut MoveList) {
        for side in [CastleSide::King, CastleSide::Queen] {
            if !self.castling.has(ctx.us, side) {
                continue;
            }
            let (king_from, king_to, rook_from, rook_to) = side.squares(ctx.us);
            let path = between(king_from, rook_from) ^ Bitboard::from_square(rook_from);
            if (path & ctx.occupied).is_nonempty() {
                continue;
            }
            // king_from is known safe: castling is only generated out of check
            if [rook_to, king_to]
                .into_iter()
                .any(|sq| self.is_attacked(sq, ctx.them, ctx.occupied))
            {
                continue;
            }
            moves.push(Move::castle(ctx.us, side));
        }
    }
}
