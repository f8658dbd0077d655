//! Lazy SMP (Symmetric `MultiProcessing`) parallel search.
//!
//! Helper threads search the same position independently, each on its own
//! `Position` clone with private killers, history and evaluator. The only
//! thing they share with the main thread is the transposition table, which is
//! how their work reaches it. Only the main thread's result is reported.

use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

use log::warn;

use super::alphabeta::SearchContext;
use super::{MoveOrderer, SearchLimits, SearchOutcome, Searcher};
use crate::board::{Evaluator, Position};
use crate::sync::{StopFlag, Timer};

/// Search thread stack size (32 MB to handle deep recursion)
const SEARCH_STACK_SIZE: usize = 32 * 1024 * 1024;

/// Get depth offset for a helper thread.
///
/// Odd helpers search one ply deeper than the main thread so the table holds
/// deeper entries by the time it arrives; even helpers search at the same
/// depth and differ only by move order.
fn helper_depth_offset(worker_id: usize) -> i32 {
    i32::from(worker_id % 2 == 1)
}

/// Trips when the main search finishes or the caller's timer does
struct HelperTimer<'a> {
    main: &'a dyn Timer,
    done: &'a StopFlag,
}

impl Timer for HelperTimer<'_> {
    fn start(&self) {}

    #[inline]
    fn should_stop(&self) -> bool {
        self.done.is_stopped() || self.main.should_stop()
    }

    fn stop(&self) {
        self.done.set();
    }
}

/// Run the main search with `searcher.threads() - 1` helpers alongside.
pub(super) fn search_parallel<E: Evaluator + Clone>(
    searcher: &mut Searcher<E>,
    pos: &mut Position,
    limits: &SearchLimits,
    timer: &dyn Timer,
) -> SearchOutcome {
    let tt = std::sync::Arc::clone(&searcher.tt);
    let params = searcher.params.clone();
    let done = StopFlag::new();
    let helper_nodes = AtomicU64::new(0);
    // Helpers run until told to stop; the main thread owns the node budget
    let helper_limits = SearchLimits {
        nodes: None,
        ..limits.clone()
    };
    let max_depth = limits.max_depth();

    let mut outcome = thread::scope(|scope| {
        for worker_id in 1..searcher.threads {
            let mut board = pos.clone();
            let mut evaluator = searcher.evaluator.clone();
            let tt = &*tt;
            let params = &params;
            let done = &done;
            let helper_nodes = &helper_nodes;
            let helper_limits = &helper_limits;

            let spawned = thread::Builder::new()
                .name(format!("search-{worker_id}"))
                .stack_size(SEARCH_STACK_SIZE)
                .spawn_scoped(scope, move || {
                    let helper_timer = HelperTimer { main: timer, done };
                    let mut orderer = MoveOrderer::new();
                    evaluator.refresh(&board);
                    let mut ctx = SearchContext::new(
                        &mut board,
                        &mut evaluator,
                        &mut orderer,
                        tt,
                        params,
                        &helper_timer,
                        helper_limits,
                    );
                    ctx.set_helper();
                    let result = ctx.iterate(max_depth + helper_depth_offset(worker_id));
                    helper_nodes.fetch_add(result.nodes, Ordering::Relaxed);
                });
            if let Err(err) = spawned {
                warn!("could not spawn search helper {worker_id}: {err}");
            }
        }

        let outcome = searcher.search_single(pos, limits, timer);
        done.set();
        outcome
    });

    outcome.nodes += helper_nodes.load(Ordering::Relaxed);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odd_helpers_search_deeper() {
        assert_eq!(helper_depth_offset(1), 1);
        assert_eq!(helper_depth_offset(2), 0);
        assert_eq!(helper_depth_offset(3), 1);
    }

    #[test]
    fn helper_timer_follows_both_flags() {
        let main = StopFlag::new();
        let done = StopFlag::new();
        let helper = HelperTimer { main: &main, done: &done };
        assert!(!helper.should_stop());
        main.stop();
        assert!(helper.should_stop());
        main.start();
        helper.stop();
        assert!(helper.should_stop());
        assert!(!main.should_stop());
    }
}
