use super::super::attack_tables::{bishop_attacks, pawn_attacks, rook_attacks};
use super::super::types::PROMOTION_PIECES;
use super::super::{Bitboard, Move, MoveList, Piece, Position, Square};
use super::{Constraints, GenMode};

impl Position {
    /// Pawn pushes, captures, promotions and en passant for either color
    pub(crate) fn pawn_moves(&self, ctx: &Constraints, mode: GenMode, moves: &mut MoveList) {
        let us = ctx.us;
        let push = us.pawn_push();
        let start_rank = if push > 0 { 1 } else { 6 };
        let promo_rank = if push > 0 { 7 } else { 0 };

        for from in self.pieces_of(us, Piece::Pawn) {
            let allowed = ctx.block & ctx.pin_ray(from);

            let mut targets = pawn_attacks(us, from) & ctx.enemy;
            let one = from.offset(push);
            if !ctx.occupied.contains(one) {
                // Quiet pushes only matter in captures mode when they promote
                if mode == GenMode::All || one.rank() == promo_rank {
                    targets |= Bitboard::from_square(one);
                }
                if mode == GenMode::All && from.rank() == start_rank {
                    let two = one.offset(push);
                    if !ctx.occupied.contains(two) {
                        targets |= Bitboard::from_square(two);
                    }
                }
            }

            for to in targets & allowed {
                let captured = self.captured_on(ctx, to);
                if to.rank() == promo_rank {
                    for promo in PROMOTION_PIECES {
                        moves.push(Move::promotion(from, to, promo, captured));
                    }
                } else {
                    moves.push(Move::normal(from, to, Piece::Pawn, captured));
                }
            }

            if let Some(ep) = self.en_passant {
                if pawn_attacks(us, from).contains(ep) && self.en_passant_is_legal(ctx, from, ep) {
                    moves.push(Move::en_passant(from, ep));
                }
            }
        }
    }

    /// En passant removes two pawns from one rank at once, so besides the usual
    /// check and pin masks the king must survive the resulting occupancy.
    fn en_passant_is_legal(&self, ctx: &Constraints, from: Square, ep: Square) -> bool {
        let victim = ep.offset(-ctx.us.pawn_push());
        if !ctx.block.contains(ep) && !ctx.block.contains(victim) {
            return false;
        }
        if !ctx.pin_ray(from).contains(ep) {
            return false;
        }

        let occupied = (ctx.occupied
            ^ Bitboard::from_square(from)
            ^ Bitboard::from_square(victim))
            | Bitboard::from_square(ep);
        let queens = self.pieces_of(ctx.them, Piece::Queen);
        let rooks = self.pieces_of(ctx.them, Piece::Rook) | queens;
        let bishops = self.pieces_of(ctx.them, Piece::Bishop) | queens;
        (rook_attacks(ctx.king, occupied) & rooks).is_empty()
            && (bishop_attacks(ctx.king, occupied) & bishops).is_empty()
    }
}
