//! Search tests: pruning transparency, cancellation and terminal positions.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use rand::prelude::*;

use crate::board::search::constants::{DRAW_SCORE, INF};
use crate::board::{
    ClassicalEval, Evaluator, MaterialEval, Move, Position, SearchInfo, SearchLimits, SearchOutcome,
    SearchParams, Searcher, MATE_SCORE,
};
use crate::sync::{StopFlag, Timer};

fn pos(fen: &str) -> Position {
    Position::from_fen(fen).expect("valid fen")
}

fn search_with(
    params: SearchParams,
    board: &mut Position,
    limits: &SearchLimits,
) -> SearchOutcome {
    let mut searcher = Searcher::new(MaterialEval);
    searcher.set_params(params);
    searcher.search(board, limits, &StopFlag::new())
}

/// Trips after a fixed number of polls
struct CountingTimer {
    calls: AtomicU64,
    trip_at: u64,
}

impl CountingTimer {
    fn new(trip_at: u64) -> Self {
        CountingTimer {
            calls: AtomicU64::new(0),
            trip_at,
        }
    }
}

impl Timer for CountingTimer {
    fn start(&self) {
        self.calls.store(0, Ordering::Relaxed);
    }

    fn should_stop(&self) -> bool {
        self.calls.fetch_add(1, Ordering::Relaxed) + 1 >= self.trip_at
    }

    fn stop(&self) {
        self.calls.store(self.trip_at, Ordering::Relaxed);
    }
}

/// Plain depth-limited negamax with the same draw, mate and horizon rules
fn minimax(board: &mut Position, depth: i32, ply: i32) -> i32 {
    if ply > 0 && board.is_draw() {
        return DRAW_SCORE;
    }
    if depth == 0 {
        return MaterialEval.evaluate(board);
    }
    let moves = board.generate_moves();
    if moves.is_empty() {
        return if board.in_check() { -MATE_SCORE + ply } else { DRAW_SCORE };
    }
    let mut best = -INF;
    for &mv in moves.iter() {
        board.apply(mv);
        best = best.max(-minimax(board, depth - 1, ply + 1));
        board.undo();
    }
    best
}

/// Root move scores from the reference search
fn root_scores(board: &mut Position, depth: i32) -> Vec<(Move, i32)> {
    let moves = board.generate_moves();
    moves
        .iter()
        .map(|&mv| {
            board.apply(mv);
            let score = -minimax(board, depth - 1, 1);
            board.undo();
            (mv, score)
        })
        .collect()
}

fn assert_matches_minimax(fen: &str, depth: u32) {
    let mut board = pos(fen);
    let scores = root_scores(&mut board, depth as i32);
    let best_score = scores.iter().map(|&(_, s)| s).max().expect("root has moves");
    let best_moves: Vec<Move> = scores
        .iter()
        .filter(|&&(_, s)| s == best_score)
        .map(|&(mv, _)| mv)
        .collect();

    let outcome = search_with(SearchParams::exhaustive(), &mut board, &SearchLimits::depth(depth));
    assert_eq!(outcome.score, best_score, "score differs from minimax on {fen}");
    let chosen = outcome.best_move.expect("a move");
    assert!(
        best_moves.contains(&chosen),
        "{chosen} is not among the minimax best moves on {fen}"
    );
    if best_moves.len() == 1 {
        assert_eq!(chosen, best_moves[0]);
    }
    assert_eq!(board.to_fen(), pos(fen).to_fen());
}

// ============================================================================
// Pruning transparency
// ============================================================================

#[test]
fn exhaustive_search_matches_minimax_on_fixed_positions() {
    let cases = [
        ("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3", 3),
        ("4k3/8/8/3q4/8/2N5/8/4K3 w - - 0 1", 3),
        ("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1", 2),
        ("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 3),
        ("6k1/5ppp/8/8/8/8/5PPP/3R2K1 w - - 0 1", 3),
    ];
    for (fen, depth) in cases {
        assert_matches_minimax(fen, depth);
    }
}

#[test]
fn exhaustive_search_matches_minimax_on_random_positions() {
    let mut rng = StdRng::seed_from_u64(0xA11CE);
    let mut checked = 0;
    while checked < 8 {
        let mut board = Position::startpos();
        for _ in 0..rng.gen_range(4..30) {
            let moves = board.generate_moves();
            if moves.is_empty() {
                break;
            }
            board.apply(moves[rng.gen_range(0..moves.len())]);
        }
        if board.generate_moves().len() < 2 || board.is_draw() {
            continue;
        }
        assert_matches_minimax(&board.to_fen(), 2);
        checked += 1;
    }
}

#[test]
fn pruning_does_not_change_forced_mate() {
    // Back-rank mate: every configuration must find Rd8#
    let fen = "6k1/5ppp/8/8/8/8/5PPP/3R2K1 w - - 0 1";
    for params in [SearchParams::default(), SearchParams::exhaustive()] {
        let mut board = pos(fen);
        let outcome = search_with(params, &mut board, &SearchLimits::depth(4));
        assert_eq!(outcome.best_move.map(|m| m.to_string()).as_deref(), Some("d1d8"));
        assert_eq!(outcome.score, MATE_SCORE - 1);
        assert_eq!(outcome.mate_in(), Some(1));
    }
}

// ============================================================================
// Cancellation
// ============================================================================

#[test]
fn timeout_restores_position_and_returns_legal_move() {
    let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    for trip_at in [1, 2, 50, 777, 5000, 20_000] {
        let mut board = pos(fen);
        board.apply_uci("e1g1").expect("legal");
        board.apply_uci("h3g2").expect("legal");
        let before_fen = board.to_fen();
        let before_hash = board.hash();
        let before_len = board.history_len();

        let timer = CountingTimer::new(trip_at);
        let mut searcher = Searcher::new(ClassicalEval);
        let outcome = searcher.search(&mut board, &SearchLimits::depth(20), &timer);

        assert!(outcome.aborted, "trip at {trip_at} should abort");
        assert_eq!(board.to_fen(), before_fen);
        assert_eq!(board.hash(), before_hash);
        assert_eq!(board.history_len(), before_len);
        let mv = outcome.best_move.expect("fallback move");
        assert!(board.is_legal(mv), "{mv} is not legal");
    }
}

#[test]
fn stopped_timer_falls_back_to_first_legal_move() {
    let mut board = Position::startpos();
    let mut searcher = Searcher::new(ClassicalEval);
    let outcome = searcher.search(&mut board, &SearchLimits::depth(5), &StopFlag::stopped());
    assert!(outcome.aborted);
    assert_eq!(outcome.depth, 0);
    assert_eq!(outcome.best_move, board.generate_moves().first());
    assert_eq!(outcome.pv.len(), 1);
}

#[test]
fn node_limit_aborts_search() {
    let mut board = Position::startpos();
    let outcome = search_with(SearchParams::default(), &mut board, &SearchLimits::nodes(2_000));
    assert!(outcome.aborted);
    assert!(outcome.nodes <= 2_000);
    assert!(outcome.depth >= 1);
    assert!(board.is_legal(outcome.best_move.expect("a move")));
    assert_eq!(board.history_len(), 0);
}

// ============================================================================
// Terminal and trivial roots
// ============================================================================

#[test]
fn checkmated_root_has_no_move() {
    let mut board = pos("7k/7Q/7K/8/8/8/8/8 b - - 0 1");
    let outcome = search_with(SearchParams::default(), &mut board, &SearchLimits::depth(3));
    assert_eq!(outcome.best_move, None);
    assert_eq!(outcome.score, -MATE_SCORE);
}

#[test]
fn stalemated_root_scores_draw() {
    let mut board = pos("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
    let outcome = search_with(SearchParams::default(), &mut board, &SearchLimits::depth(3));
    assert_eq!(outcome.best_move, None);
    assert_eq!(outcome.score, DRAW_SCORE);
}

#[test]
fn single_legal_move_is_returned_without_search() {
    // The rook holds the g-file, so the king can only go to h7
    let mut board = pos("7k/8/8/8/8/8/8/K5R1 b - - 0 1");
    assert_eq!(board.generate_moves().len(), 1);
    let outcome = search_with(SearchParams::default(), &mut board, &SearchLimits::depth(6));
    assert_eq!(outcome.best_move.map(|m| m.to_string()).as_deref(), Some("h8h7"));
    assert_eq!(outcome.nodes, 0);
}

#[test]
fn prefers_mate_over_stalemate() {
    // Qf7 stalemates, Qf8 mates
    let mut board = pos("7k/8/6K1/8/8/8/8/5Q2 w - - 0 1");
    let outcome = search_with(SearchParams::default(), &mut board, &SearchLimits::depth(3));
    assert_eq!(outcome.score, MATE_SCORE - 1);
    let mv = outcome.best_move.expect("a move");
    board.apply(mv);
    assert!(board.is_checkmate(), "{mv} does not mate");
}

#[test]
fn wins_hanging_queen() {
    let mut board = pos("4k3/8/8/3q4/8/2N5/8/4K3 w - - 0 1");
    let outcome = search_with(SearchParams::default(), &mut board, &SearchLimits::depth(4));
    assert_eq!(outcome.best_move.map(|m| m.to_string()).as_deref(), Some("c3d5"));
}

// ============================================================================
// Reporting
// ============================================================================

#[test]
fn pv_is_legal_and_starts_with_best_move() {
    let mut board = pos("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3");
    let mut searcher = Searcher::new(ClassicalEval);
    let outcome = searcher.search(&mut board, &SearchLimits::depth(5), &StopFlag::new());

    assert_eq!(outcome.pv.first().copied(), outcome.best_move);
    assert!(outcome.pv.len() <= 5);
    let mut replay = board.clone();
    for &mv in &outcome.pv {
        assert!(replay.is_legal(mv), "pv move {mv} is illegal");
        replay.apply(mv);
    }
    assert_eq!(board.history_len(), 0);
    assert_eq!(outcome.depth, 5);
    assert!(outcome.seldepth >= 5);
}

#[test]
fn info_callback_sees_every_iteration() {
    let seen: Arc<Mutex<Vec<SearchInfo>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let mut board = Position::startpos();
    let mut searcher = Searcher::new(ClassicalEval);
    searcher.set_info_callback(Some(Arc::new(move |info: &SearchInfo| {
        sink.lock().push(info.clone());
    })));
    let outcome = searcher.search(&mut board, &SearchLimits::depth(4), &StopFlag::new());

    let seen = seen.lock();
    let depths: Vec<u32> = seen.iter().map(|info| info.depth).collect();
    assert_eq!(depths, vec![1, 2, 3, 4]);
    let last = seen.last().expect("reported");
    assert_eq!(last.score, outcome.score);
    assert_eq!(last.pv, outcome.pv);
    assert!(seen.windows(2).all(|w| w[0].nodes <= w[1].nodes));
}

#[test]
fn repeated_searches_are_independent_of_leftover_state() {
    let fen = "4k3/8/8/3q4/8/2N5/8/4K3 w - - 0 1";
    let mut searcher = Searcher::new(MaterialEval);
    searcher.set_params(SearchParams::exhaustive());
    let mut board = pos(fen);
    let first = searcher.search(&mut board, &SearchLimits::depth(3), &StopFlag::new());
    let second = searcher.search(&mut board, &SearchLimits::depth(3), &StopFlag::new());
    assert_eq!(first.score, second.score);
    searcher.clear();
    let third = searcher.search(&mut board, &SearchLimits::depth(3), &StopFlag::new());
    assert_eq!(first.score, third.score);
}
