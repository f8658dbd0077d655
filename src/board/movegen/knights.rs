use super::super::attack_tables::knight_attacks;
use super::super::{MoveList, Piece, Position};
use super::{Constraints, GenMode};

impl Position {
    pub(crate) fn knight_moves(&self, ctx: &Constraints, mode: GenMode, moves: &mut MoveList) {
        let targets = ctx.targets(mode) & ctx.block;
        // A pinned knight can never stay on its pin line
        for from in self.pieces_of(ctx.us, Piece::Knight) & !ctx.pinned() {
            self.push_targets(ctx, Piece::Knight, from, knight_attacks(from) & targets, moves);
        }
    }
}
