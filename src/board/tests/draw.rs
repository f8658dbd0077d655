//! Draw detection tests.

use crate::board::Position;

fn pos(fen: &str) -> Position {
    Position::from_fen(fen).expect("valid fen")
}

fn play(pos: &mut Position, moves: &[&str]) {
    for uci in moves {
        pos.apply_uci(uci).expect("legal move");
    }
}

#[test]
fn test_fen_halfmove_parsing() {
    let board = pos("8/8/8/8/8/8/8/K1k5 w - - 57 1");
    assert_eq!(board.halfmove_clock(), 57);
}

#[test]
fn test_fifty_move_rule_draw() {
    let board = pos("8/8/8/8/8/8/4P3/K1k5 w - - 100 1");
    assert!(board.is_draw());
    let board = pos("8/8/8/8/8/8/4P3/K1k5 w - - 99 1");
    assert!(!board.is_draw());
}

#[test]
fn test_halfmove_resets_on_pawn_move() {
    let mut board = pos("8/8/8/8/8/8/4P3/K1k5 w - - 99 1");
    play(&mut board, &["e2e4"]);
    assert_eq!(board.halfmove_clock(), 0);
    assert!(!board.is_draw());
}

#[test]
fn test_halfmove_counts_quiet_moves() {
    let mut board = pos("8/8/8/8/8/8/4P3/K1k5 w - - 99 1");
    play(&mut board, &["a1a2"]);
    assert_eq!(board.halfmove_clock(), 100);
    assert!(board.is_draw());
    board.undo();
    assert!(!board.is_draw());
}

#[test]
fn test_repetition_after_knight_shuffle() {
    let mut board = Position::startpos();
    play(&mut board, &["g1f3", "g8f6", "f3g1"]);
    assert!(!board.is_repetition());
    play(&mut board, &["f6g8"]);
    assert!(board.is_repetition());
    assert!(board.is_draw());
}

#[test]
fn test_repetition_restarts_after_pawn_move() {
    let mut board = Position::startpos();
    play(&mut board, &["g1f3", "g8f6", "f3g1", "f6g8"]);
    assert!(board.is_repetition());
    // A single push: a double push would leave an en passant square behind
    play(&mut board, &["e2e3"]);
    assert!(!board.is_repetition());
    play(&mut board, &["g8f6", "g1f3", "f6g8"]);
    assert!(!board.is_repetition());
    play(&mut board, &["f3g1"]);
    assert!(board.is_repetition());
}

#[test]
fn test_null_move_separates_positions() {
    let mut board = Position::startpos();
    play(&mut board, &["g1f3"]);
    board.apply_null();
    play(&mut board, &["f3g1"]);
    board.apply_null();
    // Same position as the start, but only through passed turns
    assert_eq!(board.hash(), Position::startpos().hash());
    assert!(!board.is_repetition());
    board.unwind_to(0);
    assert_eq!(board.history_len(), 0);
    assert_eq!(board.hash(), Position::startpos().hash());
}

#[test]
fn test_castling_rights_change_breaks_repetition() {
    let mut board = pos("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    play(&mut board, &["e1f1", "e8f8", "f1e1", "f8e8"]);
    // The kings are back but the rights are gone, so the position differs
    assert!(!board.is_repetition());
    play(&mut board, &["e1f1", "e8f8", "f1e1", "f8e8"]);
    assert!(board.is_repetition());
}

#[test]
fn test_insufficient_material_draw() {
    assert!(pos("8/8/8/8/8/8/8/K1k5 w - - 0 1").is_insufficient_material());
    assert!(pos("8/8/8/8/8/8/6N1/K1k5 w - - 0 1").is_draw());
    assert!(pos("8/8/8/8/8/8/6b1/K1k5 w - - 0 1").is_draw());
    assert!(!pos("8/8/8/8/8/8/5NN1/K1k5 w - - 0 1").is_insufficient_material());
    assert!(!pos("8/8/8/8/8/8/6R1/K1k5 w - - 0 1").is_draw());
    assert!(!pos("8/8/8/8/8/8/6P1/K1k5 w - - 0 1").is_draw());
}

#[test]
fn test_checkmate_is_not_a_draw() {
    let board = pos("7k/7Q/7K/8/8/8/8/8 b - - 0 1");
    assert!(board.is_checkmate());
    assert!(!board.is_stalemate());
    assert!(!board.is_draw());
}
