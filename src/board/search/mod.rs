//! Search module implementing alpha-beta with iterative deepening.
//!
//! Features:
//! - Iterative deepening with aspiration windows
//! - Fail-hard negamax alpha-beta with principal variation search
//! - Null move, reverse futility and futility pruning
//! - Late move reductions (LMR)
//! - Quiescence search with stand-pat, SEE and delta pruning
//! - Move ordering (hash move, SEE captures, killers, promotions, history)
//! - Transposition table for move ordering and cutoffs
//! - Lazy SMP parallel search support
//!
//! Cancellation is cooperative: every node polls the [`Timer`]. A tripped
//! timer surfaces as `Err(SearchAborted)`, which propagates up to the
//! iterative deepening loop; that loop unwinds the position's move history to
//! where the search started and reports the last completed iteration.

mod alphabeta;
pub(crate) mod constants;
mod ordering;
mod params;
mod smp;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::sync::Timer;
use crate::tt::{TranspositionTable, DEFAULT_TT_MB};

use super::{Evaluator, Move, Position};
use alphabeta::SearchContext;
pub use constants::{INF, MATE_BOUND, MATE_SCORE, MAX_SEARCH_DEPTH};
pub use ordering::{HistoryTable, KillerTable, MoveOrderer};
pub use params::SearchParams;

/// Control-flow signal raised when the timer trips mid-search.
///
/// Never escapes [`Searcher::search`]; the iterative deepening loop turns it
/// into "return the best move found so far".
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("search aborted")]
pub struct SearchAborted;

/// What bounds a search. Unset fields are unbounded.
///
/// `movetime` is checked against the wall clock inside the search; callers
/// that want a dedicated timer thread pass a [`crate::timer::DeadlineTimer`]
/// as the timer instead.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchLimits {
    pub depth: Option<u32>,
    pub movetime: Option<Duration>,
    pub nodes: Option<u64>,
}

impl SearchLimits {
    #[must_use]
    pub fn depth(depth: u32) -> Self {
        SearchLimits {
            depth: Some(depth),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn movetime(movetime: Duration) -> Self {
        SearchLimits {
            movetime: Some(movetime),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn nodes(nodes: u64) -> Self {
        SearchLimits {
            nodes: Some(nodes),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = Some(depth);
        self
    }

    #[must_use]
    pub fn with_movetime(mut self, movetime: Duration) -> Self {
        self.movetime = Some(movetime);
        self
    }

    #[must_use]
    pub fn with_nodes(mut self, nodes: u64) -> Self {
        self.nodes = Some(nodes);
        self
    }

    /// Deepest iteration to run
    #[must_use]
    pub(crate) fn max_depth(&self) -> i32 {
        self.depth
            .map_or(MAX_SEARCH_DEPTH, |d| i32::try_from(d).unwrap_or(MAX_SEARCH_DEPTH))
            .clamp(1, MAX_SEARCH_DEPTH)
    }
}

/// Result of a search.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Best move of the last completed iteration, or the first legal move if
    /// none completed. `None` only when the side to move has no legal move.
    pub best_move: Option<Move>,
    /// Score of the last completed iteration, side to move's point of view
    pub score: i32,
    /// Depth of the last completed iteration (0 if none completed)
    pub depth: u32,
    pub seldepth: u32,
    pub nodes: u64,
    pub pv: Vec<Move>,
    pub elapsed: Duration,
    /// Whether the timer or node limit cut the search short
    pub aborted: bool,
}

impl SearchOutcome {
    /// Moves to mate, negative when being mated
    #[must_use]
    pub fn mate_in(&self) -> Option<i32> {
        mate_in(self.score)
    }
}

/// Information about a completed search iteration.
#[derive(Debug, Clone)]
pub struct SearchInfo {
    pub depth: u32,
    pub seldepth: u32,
    pub score: i32,
    pub nodes: u64,
    pub elapsed: Duration,
    /// Table fullness in per mille
    pub hashfull: u32,
    pub pv: Vec<Move>,
}

impl SearchInfo {
    #[must_use]
    pub fn mate_in(&self) -> Option<i32> {
        mate_in(self.score)
    }

    #[must_use]
    pub fn nps(&self) -> u64 {
        let micros = self.elapsed.as_micros().max(1);
        u64::try_from(u128::from(self.nodes) * 1_000_000 / micros).unwrap_or(u64::MAX)
    }
}

impl fmt::Display for SearchInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "depth {} seldepth {} score ", self.depth, self.seldepth)?;
        match self.mate_in() {
            Some(moves) => write!(f, "mate {moves}")?,
            None => write!(f, "cp {}", self.score)?,
        }
        write!(
            f,
            " nodes {} nps {} hashfull {} time {} pv",
            self.nodes,
            self.nps(),
            self.hashfull,
            self.elapsed.as_millis()
        )?;
        for mv in &self.pv {
            write!(f, " {mv}")?;
        }
        Ok(())
    }
}

/// Callback type for iteration info.
pub type SearchInfoCallback = Arc<dyn Fn(&SearchInfo) + Send + Sync>;

/// Convert a mate score to full moves, positive when the side to move mates
#[must_use]
pub fn mate_in(score: i32) -> Option<i32> {
    if score >= MATE_BOUND {
        Some((MATE_SCORE - score + 1) / 2)
    } else if score <= -MATE_BOUND {
        Some(-(MATE_SCORE + score + 1) / 2)
    } else {
        None
    }
}

/// Search driver holding everything that persists between searches: the
/// evaluator, the shared transposition table, ordering heuristics and
/// parameters.
pub struct Searcher<E> {
    evaluator: E,
    tt: Arc<TranspositionTable>,
    orderer: MoveOrderer,
    params: SearchParams,
    threads: usize,
    info_callback: Option<SearchInfoCallback>,
}

impl<E: Evaluator + Clone> Searcher<E> {
    #[must_use]
    pub fn new(evaluator: E) -> Self {
        Self::with_table(evaluator, Arc::new(TranspositionTable::new(DEFAULT_TT_MB)))
    }

    /// Searcher using an existing, possibly shared, table
    #[must_use]
    pub fn with_table(evaluator: E, tt: Arc<TranspositionTable>) -> Self {
        Searcher {
            evaluator,
            tt,
            orderer: MoveOrderer::new(),
            params: SearchParams::default(),
            threads: 1,
            info_callback: None,
        }
    }

    #[must_use]
    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    pub fn set_params(&mut self, params: SearchParams) {
        self.params = params;
    }

    #[must_use]
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Number of search threads including the main one
    pub fn set_threads(&mut self, threads: usize) {
        self.threads = threads.max(1);
    }

    #[must_use]
    pub fn tt(&self) -> &Arc<TranspositionTable> {
        &self.tt
    }

    /// Replace the table with a fresh one of `size_mb` megabytes
    pub fn resize_tt(&mut self, size_mb: usize) {
        self.tt = Arc::new(TranspositionTable::new(size_mb));
    }

    pub fn evaluator_mut(&mut self) -> &mut E {
        &mut self.evaluator
    }

    pub fn set_info_callback(&mut self, callback: Option<SearchInfoCallback>) {
        self.info_callback = callback;
    }

    /// Forget everything learned from earlier searches
    pub fn clear(&mut self) {
        self.tt.clear();
        self.orderer.reset();
    }

    /// Find the best move for the side to move in `pos`.
    ///
    /// `pos` is mutated during the search and restored before returning, even
    /// when the timer trips.
    pub fn search(&mut self, pos: &mut Position, limits: &SearchLimits, timer: &dyn Timer) -> SearchOutcome {
        if self.threads > 1 {
            smp::search_parallel(self, pos, limits, timer)
        } else {
            self.search_single(pos, limits, timer)
        }
    }

    /// Run the main search thread
    pub(crate) fn search_single(
        &mut self,
        pos: &mut Position,
        limits: &SearchLimits,
        timer: &dyn Timer,
    ) -> SearchOutcome {
        // History and killers are per search
        self.orderer.reset();
        self.evaluator.refresh(pos);
        let mut ctx = SearchContext::new(
            pos,
            &mut self.evaluator,
            &mut self.orderer,
            &self.tt,
            &self.params,
            timer,
            limits,
        );
        ctx.set_info_callback(self.info_callback.as_ref());
        ctx.iterate(limits.max_depth())
    }
}
