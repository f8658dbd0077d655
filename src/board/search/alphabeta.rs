//! Core search implementation.
//!
//! This module implements:
//! - Fail-hard negamax alpha-beta with PVS
//! - Transposition table cutoffs at non-PV nodes
//! - Repetition, fifty-move and insufficient material draws
//! - Mate distance pruning
//! - Reverse futility and null move pruning (see `pruning`)
//! - Futility pruning of quiet moves
//! - Late move reductions (LMR) with full-depth re-search
//! - Quiescence search (see `quiescence`)
//! - Iterative deepening with aspiration windows (see `iterative`)

mod iterative;
mod pruning;
mod quiescence;

use std::time::Instant;

use once_cell::sync::Lazy;

use super::constants::{
    DRAW_SCORE, LMR_TABLE_MAX_DEPTH, LMR_TABLE_MAX_IDX, MATE_SCORE, TIME_CHECK_SHIFT,
};
use super::{MoveOrderer, SearchAborted, SearchInfoCallback, SearchLimits, SearchParams};
use crate::board::{Evaluator, Move, Position, MAX_PLY};
use crate::sync::Timer;
use crate::tt::{score_from_tt, score_to_tt, BoundType, TranspositionTable};

/// Precomputed LMR table: `0.53 + ln(depth) * ln(index) / 2.44`
static LMR_TABLE: Lazy<Vec<[u8; LMR_TABLE_MAX_IDX]>> = Lazy::new(|| {
    let mut table = vec![[0u8; LMR_TABLE_MAX_IDX]; LMR_TABLE_MAX_DEPTH];
    for (depth, row) in table.iter_mut().enumerate().skip(1) {
        for (idx, cell) in row.iter_mut().enumerate().skip(1) {
            let val = (0.53 + (depth as f64).ln() * (idx as f64).ln() / 2.44).floor();
            *cell = val.clamp(0.0, f64::from(u8::MAX)) as u8;
        }
    }
    table
});

/// Search context for a single search on one thread
pub(crate) struct SearchContext<'a, E: Evaluator> {
    pos: &'a mut Position,
    evaluator: &'a mut E,
    orderer: &'a mut MoveOrderer,
    tt: &'a TranspositionTable,
    params: &'a SearchParams,
    timer: &'a dyn Timer,
    info_callback: Option<&'a SearchInfoCallback>,
    start: Instant,
    deadline: Option<Instant>,
    node_limit: Option<u64>,
    nodes: u64,
    seldepth: usize,
    /// History length when the search began; the abort path unwinds to it
    root_len: usize,
    /// Move that raised alpha at the root in the current pass
    root_best: Option<Move>,
    /// Best move of the last completed iteration, searched first at the root
    prev_best: Option<Move>,
    /// Helpers stay silent: no logging, no callback
    main_thread: bool,
}

impl<'a, E: Evaluator> SearchContext<'a, E> {
    pub(crate) fn new(
        pos: &'a mut Position,
        evaluator: &'a mut E,
        orderer: &'a mut MoveOrderer,
        tt: &'a TranspositionTable,
        params: &'a SearchParams,
        timer: &'a dyn Timer,
        limits: &SearchLimits,
    ) -> Self {
        let start = Instant::now();
        let root_len = pos.history_len();
        SearchContext {
            pos,
            evaluator,
            orderer,
            tt,
            params,
            timer,
            info_callback: None,
            start,
            deadline: limits.movetime.map(|movetime| start + movetime),
            node_limit: limits.nodes,
            nodes: 0,
            seldepth: 0,
            root_len,
            root_best: None,
            prev_best: None,
            main_thread: true,
        }
    }

    pub(crate) fn set_info_callback(&mut self, callback: Option<&'a SearchInfoCallback>) {
        self.info_callback = callback;
    }

    /// Mark this context as a helper thread
    pub(crate) fn set_helper(&mut self) {
        self.main_thread = false;
        self.info_callback = None;
    }

    /// Count a node and poll every stop condition
    #[inline]
    fn visit(&mut self, ply: usize) -> Result<(), SearchAborted> {
        self.nodes += 1;
        self.seldepth = self.seldepth.max(ply);

        if self.timer.should_stop() {
            return Err(SearchAborted);
        }
        if self.node_limit.is_some_and(|limit| self.nodes >= limit) {
            return Err(SearchAborted);
        }
        if let Some(deadline) = self.deadline {
            if self.nodes.trailing_zeros() >= TIME_CHECK_SHIFT && Instant::now() >= deadline {
                return Err(SearchAborted);
            }
        }
        Ok(())
    }

    /// Evaluate position from side-to-move's perspective
    #[inline]
    fn evaluate(&mut self) -> i32 {
        self.evaluator.evaluate(self.pos)
    }

    /// Reduction for the `searched`-th move (0-based) at `depth`; zero when
    /// LMR does not apply.
    fn lmr_reduction(&self, depth: i32, searched: usize) -> i32 {
        if !self.params.lmr || depth < self.params.lmr_min_depth || searched < self.params.lmr_min_move {
            return 0;
        }
        let depth_idx = (depth as usize).min(LMR_TABLE_MAX_DEPTH - 1);
        let move_idx = searched.min(LMR_TABLE_MAX_IDX - 1);
        let reduction = i32::from(LMR_TABLE[depth_idx][move_idx]);
        // Never reduce straight into quiescence
        reduction.min(depth - 2).max(0)
    }

    /// Horizon: quiescence, or the static eval when quiescence is disabled
    fn leaf(&mut self, alpha: i32, beta: i32, ply: usize) -> Result<i32, SearchAborted> {
        if self.params.quiescence {
            return self.quiescence(alpha, beta, ply, 0);
        }
        self.visit(ply)?;
        Ok(self.evaluate())
    }

    /// Fail-hard alpha-beta. The result is always within `[alpha, beta]`
    /// except for terminal mate and stalemate scores.
    pub(crate) fn alphabeta(
        &mut self,
        depth: i32,
        mut alpha: i32,
        mut beta: i32,
        ply: usize,
        allow_null: bool,
    ) -> Result<i32, SearchAborted> {
        let is_root = ply == 0;
        let is_pv = beta > alpha + 1;

        if !is_root && self.pos.is_draw() {
            return Ok(DRAW_SCORE);
        }

        if depth <= 0 {
            return self.leaf(alpha, beta, ply);
        }

        self.visit(ply)?;

        if ply >= MAX_PLY - 1 {
            return Ok(self.evaluate());
        }

        let in_check = self.pos.in_check();

        // Mate distance pruning
        if !is_root {
            alpha = alpha.max(-MATE_SCORE + ply as i32);
            beta = beta.min(MATE_SCORE - ply as i32 - 1);
            if alpha >= beta {
                return Ok(alpha);
            }
        }

        let hash = self.pos.hash();
        let entry = self.tt.probe(hash);
        let mut hash_move = entry.and_then(|e| e.best_move);
        if let Some(entry) = entry {
            if self.params.tt_cutoffs && !is_pv && entry.depth() >= depth {
                let score = score_from_tt(entry.score(), ply);
                match entry.bound {
                    BoundType::Exact => return Ok(score.clamp(alpha, beta)),
                    BoundType::LowerBound if score >= beta => return Ok(beta),
                    BoundType::UpperBound if score <= alpha => return Ok(alpha),
                    _ => {}
                }
            }
        }
        if is_root && self.prev_best.is_some() {
            hash_move = self.prev_best;
        }

        // Static evaluation for pruning decisions
        let static_eval = if in_check { -MATE_SCORE } else { self.evaluate() };

        if !is_pv && !in_check {
            if let Some(score) = self.prune_node(depth, beta, static_eval, ply, allow_null)? {
                return Ok(score);
            }
        }

        let mut moves = self.pos.generate_moves();
        if moves.is_empty() {
            return Ok(if in_check {
                -MATE_SCORE + ply as i32
            } else {
                DRAW_SCORE
            });
        }

        // A hash move from another position sharing the slot is simply absent
        let hash_move = hash_move.and_then(|mv| moves.find(mv));
        self.orderer.score_moves(self.pos, &mut moves, hash_move, ply);

        let futile = self.futility_applies(depth, alpha, static_eval, is_pv, in_check);
        let us = self.pos.side_to_move();
        let mut best_move = None;
        let mut searched = 0usize;
        let mut index = 0usize;

        while let Some(mv) = moves.pick_best(index) {
            index += 1;
            let quiet = mv.is_quiet();
            let killer = self.orderer.is_killer(mv, ply);

            self.pos.apply(mv);
            let gives_check = self.pos.in_check();

            if futile && searched > 0 && quiet && !gives_check {
                self.pos.undo();
                continue;
            }

            let new_depth = depth - 1;
            let score = if searched == 0 {
                -self.alphabeta(new_depth, -beta, -alpha, ply + 1, true)?
            } else {
                let reduction = if !is_pv && quiet && !killer && !in_check && !gives_check {
                    self.lmr_reduction(depth, searched)
                } else {
                    0
                };

                // PVS: null window search for non-first moves
                let mut score = -self.alphabeta(new_depth - reduction, -alpha - 1, -alpha, ply + 1, true)?;

                // Re-search at full depth if reduced search found something
                if reduction > 0 && score > alpha {
                    score = -self.alphabeta(new_depth, -alpha - 1, -alpha, ply + 1, true)?;
                }

                // Re-search with full window if PVS found improvement
                if score > alpha && score < beta {
                    score = -self.alphabeta(new_depth, -beta, -alpha, ply + 1, true)?;
                }
                score
            };

            self.pos.undo();
            searched += 1;

            if score >= beta {
                self.orderer.record_cutoff(us, mv, ply, depth);
                if is_root {
                    self.root_best = Some(mv);
                }
                self.tt.set(hash, depth, score_to_tt(beta, ply), BoundType::LowerBound, Some(mv));
                return Ok(beta);
            }
            if score > alpha {
                alpha = score;
                best_move = Some(mv);
                if is_root {
                    self.root_best = Some(mv);
                }
            }
        }

        let bound = if best_move.is_some() {
            BoundType::Exact
        } else {
            BoundType::UpperBound
        };
        // A fail-low node keeps the previous hash move for ordering
        self.tt.set(hash, depth, score_to_tt(alpha, ply), bound, best_move.or(hash_move));
        Ok(alpha)
    }

    /// Walk the table from the root to recover the principal variation.
    ///
    /// Every move is checked against the legal move list and the walk stops at
    /// the first repeated position, so a corrupted or cyclic chain of entries
    /// only shortens the line.
    fn extract_pv(&mut self, best: Move, max_len: usize) -> Vec<Move> {
        let mut pv = Vec::with_capacity(max_len);
        let mut seen = vec![self.pos.hash()];
        let mut next = Some(best);

        while let Some(mv) = next {
            self.pos.apply(mv);
            pv.push(mv);
            let hash = self.pos.hash();
            if pv.len() >= max_len || seen.contains(&hash) {
                break;
            }
            seen.push(hash);
            next = self
                .tt
                .probe(hash)
                .and_then(|entry| entry.best_move)
                .and_then(|mv| self.pos.generate_moves().find(mv));
        }

        self.pos.unwind_to(self.root_len);
        pv
    }
}
