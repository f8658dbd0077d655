use serde::Deserialize;

use chess_core::board::{ClassicalEval, Position, SearchLimits, Searcher, MATE_SCORE};
use chess_core::StopFlag;

#[derive(Deserialize)]
struct ProblemSet {
    problems: Vec<Problem>,
}

#[derive(Deserialize)]
struct Problem {
    #[serde(rename = "type")]
    kind: String,
    fen: String,
    moves: String,
}

const PROBLEMS: &str = r#"{
  "problems": [
    { "type": "Mate in One", "fen": "6k1/5ppp/8/8/8/8/8/4Q2K w - - 0 1", "moves": "e1-e8" },
    { "type": "Mate in One", "fen": "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 0 4", "moves": "h5-f7" },
    { "type": "Mate in One", "fen": "6k1/5ppp/8/8/8/8/5PPP/3R2K1 w - - 0 1", "moves": "d1-d8" },
    { "type": "Mate in One", "fen": "7k/8/6K1/8/8/8/8/5Q2 w - - 0 1", "moves": "f1-f8" },
    { "type": "Mate in One", "fen": "r5k1/8/8/8/8/8/5PPP/6K1 b - - 0 1", "moves": "a8-a1" },
    { "type": "Mate in One", "fen": "6rk/6pp/8/6N1/8/8/8/6K1 w - - 0 1", "moves": "g5-f7" },
    { "type": "Stalemate trap", "fen": "7k/8/6K1/8/8/8/8/5Q2 w - - 0 1", "moves": "f1-f7" }
  ]
}"#;

fn uci_from_problem_moves(moves: &str) -> String {
    moves.replace('-', "")
}

fn problems() -> Vec<Problem> {
    let set: ProblemSet = serde_json::from_str(PROBLEMS).expect("invalid problem set");
    set.problems
}

#[test]
fn mate_in_one_suite() {
    for problem in problems().iter().filter(|p| p.kind == "Mate in One") {
        let mut board = Position::from_fen(&problem.fen).expect("valid fen");
        board
            .apply_uci(&uci_from_problem_moves(&problem.moves))
            .expect("solution is legal");
        assert!(
            board.is_checkmate(),
            "mate in one failed for fen: {} move: {}",
            problem.fen,
            problem.moves
        );
    }
}

#[test]
fn mate_search_suite() {
    let mut searcher = Searcher::new(ClassicalEval);
    for problem in problems().iter().filter(|p| p.kind == "Mate in One") {
        let mut board = Position::from_fen(&problem.fen).expect("valid fen");
        searcher.clear();
        let outcome = searcher.search(&mut board, &SearchLimits::depth(3), &StopFlag::new());
        assert_eq!(outcome.score, MATE_SCORE - 1, "no mate found for {}", problem.fen);

        let mv = outcome.best_move.expect("a move");
        board.apply(mv);
        assert!(board.is_checkmate(), "{mv} does not mate in {}", problem.fen);
    }
}

#[test]
fn stalemate_traps_are_not_mates() {
    for problem in problems().iter().filter(|p| p.kind == "Stalemate trap") {
        let mut board = Position::from_fen(&problem.fen).expect("valid fen");
        board
            .apply_uci(&uci_from_problem_moves(&problem.moves))
            .expect("legal");
        assert!(board.is_stalemate());
        assert!(!board.is_checkmate());
    }
}
