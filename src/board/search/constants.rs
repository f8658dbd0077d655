//! Search constants.
//!
//! Score scale, depth limits and the move ordering bands used by the
//! alpha-beta search. Tunable pruning margins live in [`super::SearchParams`].

use crate::board::MAX_PLY;

// ============================================================================
// SCORES
// ============================================================================

/// Score of delivering mate at the root. A mate `n` plies away scores
/// `MATE_SCORE - n`.
pub const MATE_SCORE: i32 = 30_000;

/// Scores with absolute value >= this are mate scores
pub const MATE_BOUND: i32 = MATE_SCORE - MAX_PLY as i32;

/// Window bound strictly outside every reachable score
pub const INF: i32 = 31_000;

pub const DRAW_SCORE: i32 = 0;

// ============================================================================
// SEARCH LIMITS
// ============================================================================

/// Deepest iteration the iterative deepening loop will start
pub const MAX_SEARCH_DEPTH: i32 = 64;

/// Maximum quiescence search depth to prevent explosion
pub const MAX_QSEARCH_DEPTH: i32 = 8;

/// Wall clock is compared against the move time once every 2^N nodes
pub const TIME_CHECK_SHIFT: u32 = 10;

// ============================================================================
// MOVE ORDERING PRIORITIES
// ============================================================================
// Higher scores = tried earlier. Ordered: hash > captures > killers > promotions > history

/// Hash move (from transposition table) - highest priority
pub const HASH_MOVE_SCORE: i32 = 1_000_000_000;

/// Base for every capture; the exchange value and MVV-LVA are added on top
pub const CAPTURE_SCORE: i32 = 100_000_000;

/// Multiplier applied to the SEE value of a capture so MVV-LVA only breaks ties
pub const SEE_SCALE: i32 = 64;

/// First killer move (quiet that caused beta cutoff at same ply)
pub const KILLER1_SCORE: i32 = 90_000_000;

/// Second killer move (replaced killer)
pub const KILLER2_SCORE: i32 = 80_000_000;

/// History counters saturate here, well below every band above
pub const HISTORY_MAX: i32 = 1_000_000;

// ============================================================================
// REDUCTIONS
// ============================================================================

/// LMR reduction table dimensions (depth x move index buckets)
pub const LMR_TABLE_MAX_DEPTH: usize = 64;
pub const LMR_TABLE_MAX_IDX: usize = 256;
