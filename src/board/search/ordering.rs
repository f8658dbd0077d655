//! Move ordering heuristics.
//!
//! The orderer only writes [`Move::score`]; the search pulls moves in score
//! order with [`MoveList::pick_best`] so lists cut off early are never fully
//! sorted.

use super::constants::{
    CAPTURE_SCORE, HASH_MOVE_SCORE, HISTORY_MAX, KILLER1_SCORE, KILLER2_SCORE,
    SEE_SCALE,
};
use crate::board::{Color, Move, MoveList, Piece, Position, MAX_PLY};

/// Two quiet moves per ply that recently caused a beta cutoff
pub struct KillerTable {
    slots: [[Move; 2]; MAX_PLY],
}

impl Default for KillerTable {
    fn default() -> Self {
        Self::new()
    }
}

impl KillerTable {
    #[must_use]
    pub fn new() -> Self {
        KillerTable {
            slots: [[Move::NULL; 2]; MAX_PLY],
        }
    }

    #[must_use]
    pub fn primary(&self, ply: usize) -> Move {
        self.slots.get(ply).map_or(Move::NULL, |row| row[0])
    }

    #[must_use]
    pub fn secondary(&self, ply: usize) -> Move {
        self.slots.get(ply).map_or(Move::NULL, |row| row[1])
    }

    pub fn update(&mut self, ply: usize, mv: Move) {
        let Some(row) = self.slots.get_mut(ply) else {
            return;
        };
        if row[0] != mv {
            row[1] = row[0];
            row[0] = mv;
        }
    }

    pub fn reset(&mut self) {
        self.slots = [[Move::NULL; 2]; MAX_PLY];
    }
}

/// Quiet-move cutoff counters indexed by `[color][from][to]`
pub struct HistoryTable {
    entries: Box<[[[i32; 64]; 64]; 2]>,
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryTable {
    #[must_use]
    pub fn new() -> Self {
        HistoryTable {
            entries: Box::new([[[0; 64]; 64]; 2]),
        }
    }

    #[must_use]
    pub fn score(&self, color: Color, mv: Move) -> i32 {
        self.entries[color.index()][mv.from().index()][mv.to().index()]
    }

    /// Credit a quiet move that caused a beta cutoff at `depth`
    pub fn update(&mut self, color: Color, mv: Move, depth: i32) {
        let entry = &mut self.entries[color.index()][mv.from().index()][mv.to().index()];
        let bonus = depth.max(1).saturating_mul(depth.max(1));
        *entry = entry.saturating_add(bonus).min(HISTORY_MAX);
    }

    pub fn reset(&mut self) {
        for side in self.entries.iter_mut() {
            for row in side.iter_mut() {
                *row = [0; 64];
            }
        }
    }
}

/// Per-thread ordering state: killers and history.
#[derive(Default)]
pub struct MoveOrderer {
    pub killers: KillerTable,
    pub history: HistoryTable,
}

impl MoveOrderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything learned in the previous search
    pub fn reset(&mut self) {
        self.killers.reset();
        self.history.reset();
    }

    /// Score every move of a full-width node.
    ///
    /// Hash move, then captures by exchange value, then killers, then
    /// history. The promotion bonus only breaks ties within a band.
    pub fn score_moves(&self, pos: &Position, moves: &mut MoveList, hash_move: Option<Move>, ply: usize) {
        let us = pos.side_to_move();
        let killer1 = self.killers.primary(ply);
        let killer2 = self.killers.secondary(ply);

        for mv in moves.as_mut_slice() {
            let score = if Some(*mv) == hash_move {
                HASH_MOVE_SCORE
            } else if mv.is_capture() {
                capture_score(pos, *mv)
            } else if *mv == killer1 {
                KILLER1_SCORE
            } else if *mv == killer2 {
                KILLER2_SCORE
            } else {
                self.history.score(us, *mv) + mv.promotion_piece().map_or(0, promotion_bonus)
            };
            mv.set_score(score);
        }
    }

    /// Score captures and promotions for quiescence. Quiet check evasions
    /// score zero.
    pub fn score_captures(&self, pos: &Position, moves: &mut MoveList) {
        for mv in moves.as_mut_slice() {
            let score = if mv.is_capture() {
                capture_score(pos, *mv)
            } else {
                mv.promotion_piece().map_or(0, promotion_bonus)
            };
            mv.set_score(score);
        }
    }

    /// Record a quiet move that produced a beta cutoff
    pub fn record_cutoff(&mut self, color: Color, mv: Move, ply: usize, depth: i32) {
        if !mv.is_quiet() {
            return;
        }
        self.killers.update(ply, mv);
        self.history.update(color, mv, depth);
    }

    #[must_use]
    pub fn is_killer(&self, mv: Move, ply: usize) -> bool {
        mv == self.killers.primary(ply) || mv == self.killers.secondary(ply)
    }
}

/// Bonus for the promotion piece: queen > rook > bishop > knight
#[inline]
fn promotion_bonus(piece: Piece) -> i32 {
    match piece {
        Piece::Queen => 4,
        Piece::Rook => 3,
        Piece::Bishop => 2,
        Piece::Knight => 1,
        _ => 0,
    }
}

/// Exchange value scaled up, most valuable victim / least valuable attacker
/// as the tie-break, plus the promotion bonus for capturing promotions.
#[inline]
fn capture_score(pos: &Position, mv: Move) -> i32 {
    let victim = mv.captured().unwrap_or(Piece::Pawn);
    let mvv_lva = victim.index() as i32 * 8 - mv.piece().index() as i32;
    let promo = mv.promotion_piece().map_or(0, promotion_bonus);
    CAPTURE_SCORE + pos.see(mv) * SEE_SCALE + mvv_lva + promo
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(fen: &str) -> Position {
        Position::from_fen(fen).expect("valid fen")
    }

    fn ordered(board: &Position, orderer: &MoveOrderer, hash: Option<Move>) -> Vec<Move> {
        let mut moves = board.generate_moves();
        orderer.score_moves(board, &mut moves, hash, 0);
        let mut out = Vec::new();
        let mut i = 0;
        while let Some(mv) = moves.pick_best(i) {
            out.push(mv);
            i += 1;
        }
        out
    }

    #[test]
    fn hash_move_comes_first_then_captures() {
        let board = pos("4k3/8/8/3p4/4P3/8/8/4K1N1 w - - 0 1");
        let orderer = MoveOrderer::new();
        let hash = board.parse_uci("g1f3").expect("legal");
        let moves = ordered(&board, &orderer, Some(hash));
        assert_eq!(moves[0], hash);
        assert_eq!(moves[1].to_string(), "e4d5");
    }

    #[test]
    fn winning_capture_before_losing_capture() {
        // Qxd5 loses the queen to the c6 pawn, exd5 wins a pawn
        let board = pos("4k3/8/2p5/3p4/4P3/8/8/3QK3 w - - 0 1");
        let moves = ordered(&board, &MoveOrderer::new(), None);
        let exd5 = moves.iter().position(|m| m.to_string() == "e4d5").expect("exd5");
        let qxd5 = moves.iter().position(|m| m.to_string() == "d1d5").expect("qxd5");
        assert!(exd5 < qxd5);
        // Even a losing capture is tried before any quiet move
        assert!(moves[..=qxd5].iter().all(|m| m.is_capture()));
    }

    #[test]
    fn killers_rank_above_history_and_below_captures() {
        let board = pos("4k3/8/8/3p4/4P3/8/8/4K1N1 w - - 0 1");
        let mut orderer = MoveOrderer::new();
        let killer = board.parse_uci("e1d2").expect("legal");
        let favoured = board.parse_uci("g1h3").expect("legal");
        orderer.record_cutoff(Color::White, killer, 0, 1);
        for _ in 0..50 {
            orderer.history.update(Color::White, favoured, 10);
        }
        let moves = ordered(&board, &orderer, None);
        assert_eq!(moves[0].to_string(), "e4d5");
        assert_eq!(moves[1], killer);
        assert_eq!(moves[2], favoured);
    }

    #[test]
    fn quiet_promotions_are_ordered_by_piece() {
        let board = pos("4k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        let moves = ordered(&board, &MoveOrderer::new(), None);
        let promos: Vec<String> = moves.iter().take(4).map(ToString::to_string).collect();
        assert_eq!(promos, vec!["a7a8q", "a7a8r", "a7a8b", "a7a8n"]);
    }

    #[test]
    fn history_outranks_quiet_promotion_bonus() {
        let board = pos("4k3/P7/8/8/8/8/8/4K1N1 w - - 0 1");
        let mut orderer = MoveOrderer::new();
        let favoured = board.parse_uci("g1f3").expect("legal");
        orderer.history.update(Color::White, favoured, 3);
        let moves = ordered(&board, &orderer, None);
        assert_eq!(moves[0], favoured);
        let promos: Vec<String> = moves[1..5].iter().map(ToString::to_string).collect();
        assert_eq!(promos, vec!["a7a8q", "a7a8r", "a7a8b", "a7a8n"]);

        // A killer still comes before both
        orderer.record_cutoff(Color::White, board.parse_uci("g1h3").expect("legal"), 0, 1);
        let moves = ordered(&board, &orderer, None);
        assert_eq!(moves[0].to_string(), "g1h3");
    }

    #[test]
    fn killer_table_keeps_two_distinct_moves() {
        let board = Position::startpos();
        let a = board.parse_uci("e2e4").expect("legal");
        let b = board.parse_uci("d2d4").expect("legal");
        let mut killers = KillerTable::new();
        killers.update(3, a);
        killers.update(3, a);
        assert_eq!(killers.primary(3), a);
        assert!(killers.secondary(3).is_null());
        killers.update(3, b);
        assert_eq!(killers.primary(3), b);
        assert_eq!(killers.secondary(3), a);
        killers.update(MAX_PLY + 5, a);
        assert!(killers.primary(MAX_PLY + 5).is_null());
        killers.reset();
        assert!(killers.primary(3).is_null());
    }

    #[test]
    fn history_grows_by_depth_squared_and_saturates() {
        let board = Position::startpos();
        let mv = board.parse_uci("g1f3").expect("legal");
        let mut history = HistoryTable::new();
        history.update(Color::White, mv, 3);
        assert_eq!(history.score(Color::White, mv), 9);
        assert_eq!(history.score(Color::Black, mv), 0);
        for _ in 0..100_000 {
            history.update(Color::White, mv, 64);
        }
        assert_eq!(history.score(Color::White, mv), HISTORY_MAX);
        history.reset();
        assert_eq!(history.score(Color::White, mv), 0);
    }
}
