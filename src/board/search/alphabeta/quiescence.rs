use super::super::constants::{MATE_SCORE, MAX_QSEARCH_DEPTH};
use super::super::SearchAborted;
use super::SearchContext;
use crate::board::{Evaluator, Piece, MAX_PLY};

impl<E: Evaluator> SearchContext<'_, E> {
    /// Quiescence search for tactical stability with SEE and delta pruning.
    ///
    /// In check every evasion is searched and there is no stand-pat; otherwise
    /// only captures and promotions are, on top of the static eval.
    pub(super) fn quiescence(
        &mut self,
        mut alpha: i32,
        beta: i32,
        ply: usize,
        qdepth: i32,
    ) -> Result<i32, SearchAborted> {
        self.visit(ply)?;

        if ply >= MAX_PLY - 1 {
            return Ok(self.evaluate());
        }

        let in_check = self.pos.in_check();
        let stand_pat = if in_check { -MATE_SCORE } else { self.evaluate() };

        let mut moves = if in_check {
            let moves = self.pos.generate_moves();
            if moves.is_empty() {
                return Ok(-MATE_SCORE + ply as i32);
            }
            if qdepth >= MAX_QSEARCH_DEPTH {
                return Ok(self.evaluate().clamp(alpha, beta));
            }
            moves
        } else {
            // Stand pat
            if stand_pat >= beta {
                return Ok(beta);
            }
            if stand_pat > alpha {
                alpha = stand_pat;
            }
            if qdepth >= MAX_QSEARCH_DEPTH {
                return Ok(alpha);
            }
            self.pos.generate_captures()
        };

        self.orderer.score_captures(self.pos, &mut moves);

        let mut index = 0usize;
        while let Some(mv) = moves.pick_best(index) {
            index += 1;

            if !in_check && mv.is_capture() {
                // Delta pruning: even winning the victim for free stays short
                if !mv.is_promotion() {
                    let victim = mv.captured().map_or(0, Piece::value);
                    if stand_pat + victim + self.params.delta_margin <= alpha {
                        continue;
                    }
                }
                // SEE pruning: skip captures that lose material
                if self.pos.see(mv) < 0 {
                    continue;
                }
            }

            self.pos.apply(mv);
            let score = -self.quiescence(-beta, -alpha, ply + 1, qdepth + 1)?;
            self.pos.undo();

            if score >= beta {
                return Ok(beta);
            }
            if score > alpha {
                alpha = score;
            }
        }

        Ok(alpha)
    }
}
