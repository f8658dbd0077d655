//! Static evaluation.
//!
//! The search talks to evaluation only through the [`Evaluator`] trait, so a
//! network-based evaluator can replace the classical one without touching the
//! search. Scores are centipawns from the side to move's point of view.

pub(crate) mod pst;

use super::{Color, Piece, Position};
use pst::MAX_PHASE;

const BISHOP_PAIR_BONUS: i32 = 30;

/// Position evaluation collaborator.
///
/// Helper search threads each work on their own clone, hence `Send`.
pub trait Evaluator: Send {
    /// Score of `pos` for the side to move
    fn evaluate(&mut self, pos: &Position) -> i32;

    /// Resynchronize any accumulated state with `pos`. Called once before a
    /// search starts; stateless evaluators ignore it.
    fn refresh(&mut self, _pos: &Position) {}
}

/// Tapered material and PeSTO piece-square evaluation.
///
/// Reads the middlegame and endgame subtotals the position maintains
/// incrementally and blends them by game phase.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClassicalEval;

impl ClassicalEval {
    /// Score from White's point of view
    #[must_use]
    pub fn white_score(pos: &Position) -> i32 {
        let (white_mg, white_eg) = pos.psq(Color::White);
        let (black_mg, black_eg) = pos.psq(Color::Black);
        let mg = white_mg - black_mg;
        let eg = white_eg - black_eg;
        let phase = pos.game_phase().min(MAX_PHASE);
        let mut score = (mg * phase + eg * (MAX_PHASE - phase)) / MAX_PHASE;

        if pos.pieces_of(Color::White, Piece::Bishop).has_many() {
            score += BISHOP_PAIR_BONUS;
        }
        if pos.pieces_of(Color::Black, Piece::Bishop).has_many() {
            score -= BISHOP_PAIR_BONUS;
        }
        score
    }
}

impl Evaluator for ClassicalEval {
    fn evaluate(&mut self, pos: &Position) -> i32 {
        let score = Self::white_score(pos);
        match pos.side_to_move() {
            Color::White => score,
            Color::Black => -score,
        }
    }
}

/// Material balance only. Useful as a fast, predictable evaluator in tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct MaterialEval;

impl Evaluator for MaterialEval {
    fn evaluate(&mut self, pos: &Position) -> i32 {
        let us = pos.side_to_move();
        pos.material(us) - pos.material(!us)
    }
}
