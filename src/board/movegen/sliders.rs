use super::super::attack_tables::{bishop_attacks, rook_attacks};
use super::super::{MoveList, Piece, Position};
use super::{Constraints, GenMode};

impl Position {
    /// Bishop, rook and queen moves. A piece pinned along a rank or file has no
    /// diagonal moves and vice versa; otherwise the pin line restricts it.
    pub(crate) fn slider_moves(&self, ctx: &Constraints, mode: GenMode, moves: &mut MoveList) {
        let targets = ctx.targets(mode) & ctx.block;
        let queens = self.pieces_of(ctx.us, Piece::Queen);

        let diagonal = (self.pieces_of(ctx.us, Piece::Bishop) | queens) & !ctx.pinned_orth;
        for from in diagonal {
            let piece = if queens.contains(from) { Piece::Queen } else { Piece::Bishop };
            let reach = bishop_attacks(from, ctx.occupied) & targets & ctx.pin_ray(from);
            self.push_targets(ctx, piece, from, reach, moves);
        }

        let orthogonal = (self.pieces_of(ctx.us, Piece::Rook) | queens) & !ctx.pinned_diag;
        for from in orthogonal {
            let piece = if queens.contains(from) { Piece::Queen } else { Piece::Rook };
            let reach = rook_attacks(from, ctx.occupied) & targets & ctx.pin_ray(from);
            self.push_targets(ctx, piece, from, reach, moves);
        }
    }
}
