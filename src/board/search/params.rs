#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tunable search parameters.
///
/// Each selective technique has an on/off switch next to its margins, so a
/// search can be made exhaustive for testing without touching the code.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchParams {
    /// Cut off on transposition table bounds at non-PV nodes
    pub tt_cutoffs: bool,

    pub null_move: bool,
    /// Null move is tried from this remaining depth on
    pub null_min_depth: i32,
    /// Base reduction; the search adds `(depth + 1) / 3` on top
    pub null_reduction: i32,

    pub reverse_futility: bool,
    pub rfp_max_depth: i32,
    /// Per-ply margin by which the static eval must clear beta
    pub rfp_margin: i32,

    pub futility: bool,
    pub futility_max_depth: i32,
    pub futility_margin: i32,

    pub lmr: bool,
    pub lmr_min_depth: i32,
    /// Number of moves searched at full depth before reductions start
    pub lmr_min_move: usize,

    pub aspiration: bool,
    /// Iterations below this depth use a full window
    pub aspiration_min_depth: i32,
    /// Initial half-width of the window in centipawns
    pub aspiration_window: i32,
    /// Failed re-searches before the window opens completely
    pub aspiration_max_retries: u32,

    pub quiescence: bool,
    pub delta_margin: i32,
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            tt_cutoffs: true,
            null_move: true,
            null_min_depth: 3,
            null_reduction: 1,
            reverse_futility: true,
            rfp_max_depth: 4,
            rfp_margin: 100,
            futility: true,
            futility_max_depth: 3,
            futility_margin: 150,
            lmr: true,
            lmr_min_depth: 3,
            lmr_min_move: 3,
            aspiration: true,
            aspiration_min_depth: 4,
            aspiration_window: 30,
            aspiration_max_retries: 4,
            quiescence: true,
            delta_margin: 200,
        }
    }
}

impl SearchParams {
    /// Every selective technique switched off.
    ///
    /// The search then visits the same tree as a plain depth-limited minimax
    /// and only move ordering changes how much of it is cut by alpha-beta.
    #[must_use]
    pub fn exhaustive() -> Self {
        SearchParams {
            tt_cutoffs: false,
            null_move: false,
            reverse_futility: false,
            futility: false,
            lmr: false,
            aspiration: false,
            quiescence: false,
            ..SearchParams::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhaustive_disables_every_selective_technique() {
        let params = SearchParams::exhaustive();
        assert!(!params.tt_cutoffs);
        assert!(!params.null_move);
        assert!(!params.reverse_futility);
        assert!(!params.futility);
        assert!(!params.lmr);
        assert!(!params.aspiration);
        assert!(!params.quiescence);
        // Margins keep their tuned values
        assert_eq!(params.futility_margin, SearchParams::default().futility_margin);
    }
}
