//! Perft: count the leaf nodes of the legal move tree to a fixed depth.
//!
//! The reference counts for a handful of well-known positions pin down move
//! generation exactly, including castling, en passant and promotions.

use super::{Move, Position};

impl Position {
    /// Leaf nodes at `depth` plies. Depth 1 is counted in bulk from the move list.
    pub fn perft(&mut self, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves = self.generate_moves();
        if depth == 1 {
            return moves.len() as u64;
        }
        let mut nodes = 0;
        for &mv in moves.iter() {
            self.apply(mv);
            nodes += self.perft(depth - 1);
            self.undo();
        }
        nodes
    }

    /// Per-root-move leaf counts, in generation order
    pub fn perft_divide(&mut self, depth: u32) -> Vec<(Move, u64)> {
        let moves = self.generate_moves();
        let mut result = Vec::with_capacity(moves.len());
        for &mv in moves.iter() {
            self.apply(mv);
            let nodes = self.perft(depth.saturating_sub(1));
            self.undo();
            result.push((mv, nodes));
        }
        result
    }
}
