use super::super::constants::MATE_BOUND;
use super::super::SearchAborted;
use super::SearchContext;
use crate::board::Evaluator;

impl<E: Evaluator> SearchContext<'_, E> {
    /// Node-level pruning that can exit before generating moves. Only called
    /// at non-PV nodes when not in check.
    pub(super) fn prune_node(
        &mut self,
        depth: i32,
        beta: i32,
        static_eval: i32,
        ply: usize,
        allow_null: bool,
    ) -> Result<Option<i32>, SearchAborted> {
        // Reverse futility: the static eval already clears beta by a margin
        if self.params.reverse_futility
            && depth <= self.params.rfp_max_depth
            && beta.abs() < MATE_BOUND
            && static_eval - self.params.rfp_margin * depth >= beta
        {
            return Ok(Some(beta));
        }

        if allow_null {
            return self.try_null_move(depth, beta, static_eval, ply);
        }
        Ok(None)
    }

    /// Give the opponent a free move; if a reduced search still fails high the
    /// node is assumed to fail high too.
    fn try_null_move(
        &mut self,
        depth: i32,
        beta: i32,
        static_eval: i32,
        ply: usize,
    ) -> Result<Option<i32>, SearchAborted> {
        let us = self.pos.side_to_move();

        // Not in pawn endings (zugzwang) or near mate bounds
        if !self.params.null_move
            || ply == 0
            || depth < self.params.null_min_depth
            || !self.pos.has_non_pawn_material(us)
            || beta.abs() >= MATE_BOUND
            || static_eval < beta
        {
            return Ok(None);
        }

        let r = self.params.null_reduction + (depth + 1) / 3;

        self.pos.apply_null();
        let score = -self.alphabeta(depth - 1 - r, -beta, -beta + 1, ply + 1, false)?;
        self.pos.undo_null();

        if score >= beta {
            return Ok(Some(beta));
        }
        Ok(None)
    }

    /// Whether quiet, non-checking moves may be skipped at this node: the
    /// static eval plus a depth-scaled margin cannot reach alpha.
    pub(super) fn futility_applies(
        &self,
        depth: i32,
        alpha: i32,
        static_eval: i32,
        is_pv: bool,
        in_check: bool,
    ) -> bool {
        self.params.futility
            && !is_pv
            && !in_check
            && depth <= self.params.futility_max_depth
            && alpha.abs() < MATE_BOUND
            && static_eval + self.params.futility_margin * depth <= alpha
    }
}
