//! Chess position representation and game logic.
//!
//! Bitboard position with incremental Zobrist hashing and an explicit history
//! stack, legal move generation, static exchange evaluation and the search.
//!
//! # Example
//! ```
//! use chess_core::board::Position;
//!
//! let pos = Position::startpos();
//! let moves = pos.generate_moves();
//! println!("Starting position has {} legal moves", moves.len());
//! ```

pub mod attack_tables;
mod error;
mod eval;
mod fen;
mod make_unmake;
mod movegen;
mod perft;
mod san;
pub mod search;
mod see;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use error::{FenError, MoveParseError, SanError, SquareError};
pub use eval::{ClassicalEval, Evaluator, MaterialEval};
pub use fen::STARTPOS_FEN;
pub use state::{HistoryEntry, Position};
pub use types::{
    Bitboard, BitboardIter, CastleSide, CastlingRights, Color, Move, MoveKind, MoveList, Piece, Square,
    MAX_PLY,
};

pub use search::{
    mate_in, SearchAborted, SearchInfo, SearchInfoCallback, SearchLimits, SearchOutcome, SearchParams,
    Searcher, INF, MATE_BOUND, MATE_SCORE, MAX_SEARCH_DEPTH,
};
