use std::time::Instant;

use log::{debug, trace, warn};

use super::super::constants::{DRAW_SCORE, INF, MATE_BOUND, MATE_SCORE};
use super::super::{SearchAborted, SearchInfo, SearchOutcome};
use super::SearchContext;
use crate::board::{Evaluator, Move};

/// Format PV moves as a space-separated string of UCI moves
fn format_pv(pv: &[Move]) -> String {
    pv.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

impl<E: Evaluator> SearchContext<'_, E> {
    /// Iterative deepening with aspiration windows.
    ///
    /// Always leaves the position at the history length it started from, and
    /// always reports a legal move when one exists.
    pub(crate) fn iterate(&mut self, max_depth: i32) -> SearchOutcome {
        let root_moves = self.pos.generate_moves();
        let mut outcome = SearchOutcome::default();

        if root_moves.is_empty() {
            outcome.score = if self.pos.in_check() { -MATE_SCORE } else { DRAW_SCORE };
            return outcome;
        }
        // Nothing to decide with a single legal move
        if root_moves.len() == 1 && self.main_thread {
            outcome.best_move = root_moves.first();
            return outcome;
        }

        let mut score = 0;
        for depth in 1..=max_depth {
            match self.search_root(depth, score) {
                Ok(new_score) => score = new_score,
                Err(SearchAborted) => {
                    self.pos.unwind_to(self.root_len);
                    outcome.aborted = true;
                    if self.main_thread {
                        debug!(
                            "search aborted during depth {depth} after {} nodes, unwound to ply {}",
                            self.nodes, self.root_len
                        );
                    }
                    break;
                }
            }

            let Some(best) = self.root_best else {
                break;
            };
            self.prev_best = Some(best);
            let pv = self.extract_pv(best, depth as usize);

            outcome.best_move = Some(best);
            outcome.score = score;
            outcome.depth = depth as u32;
            outcome.seldepth = self.seldepth as u32;
            outcome.nodes = self.nodes;

            if self.main_thread {
                self.report(depth, score, &pv);
            }
            outcome.pv = pv;

            // A mate within the searched horizon cannot get any shorter
            if score.abs() >= MATE_BOUND && MATE_SCORE - score.abs() <= depth {
                break;
            }
            if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                break;
            }
        }

        if outcome.best_move.is_none() {
            if self.main_thread {
                warn!("no search iteration completed, falling back to the first legal move");
            }
            outcome.best_move = root_moves.first();
            outcome.pv = outcome.best_move.into_iter().collect();
        }
        outcome.nodes = self.nodes;
        outcome.seldepth = outcome.seldepth.max(self.seldepth as u32);
        outcome.elapsed = self.start.elapsed();
        outcome
    }

    /// One iteration at the root, with an aspiration window around the
    /// previous score from `aspiration_min_depth` on.
    fn search_root(&mut self, depth: i32, prev_score: i32) -> Result<i32, SearchAborted> {
        let use_window = self.params.aspiration
            && depth >= self.params.aspiration_min_depth
            && prev_score.abs() < MATE_BOUND;
        if !use_window {
            self.root_best = None;
            return self.alphabeta(depth, -INF, INF, 0, true);
        }

        let mut delta = self.params.aspiration_window;
        let mut alpha = (prev_score - delta).max(-INF);
        let mut beta = (prev_score + delta).min(INF);
        let mut retries = 0u32;

        loop {
            self.root_best = None;
            let score = self.alphabeta(depth, alpha, beta, 0, true)?;

            if score <= alpha && alpha > -INF {
                alpha = (alpha - delta).max(-INF);
            } else if score >= beta && beta < INF {
                beta = (beta + delta).min(INF);
            } else {
                return Ok(score);
            }

            retries += 1;
            delta = delta.saturating_mul(2);
            if retries >= self.params.aspiration_max_retries {
                alpha = -INF;
                beta = INF;
            }
            if self.main_thread {
                trace!("aspiration re-search at depth {depth} (score {score}), window [{alpha}, {beta}]");
            }
        }
    }

    /// Log the finished iteration and hand it to the callback
    fn report(&self, depth: i32, score: i32, pv: &[Move]) {
        debug!(
            "depth {depth} score {score} nodes {} pv {}",
            self.nodes,
            format_pv(pv)
        );
        if let Some(callback) = self.info_callback {
            let info = SearchInfo {
                depth: depth as u32,
                seldepth: self.seldepth as u32,
                score,
                nodes: self.nodes,
                elapsed: self.start.elapsed(),
                hashfull: self.tt.hashfull(),
                pv: pv.to_vec(),
            };
            callback(&info);
        }
    }
}
