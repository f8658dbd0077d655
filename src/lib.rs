pub mod board;
pub mod book;
pub mod engine;
pub mod sync;
pub mod timer;
pub mod tt;
pub mod zobrist;

pub use board::{
    ClassicalEval, Color, Evaluator, MaterialEval, Move, Piece, Position, SearchLimits, SearchOutcome,
    SearchParams, Searcher, Square,
};
pub use book::{LineBook, NoBook, OpeningBook};
pub use engine::{Engine, EngineConfig, EngineError};
pub use sync::{StopFlag, Timer};
pub use timer::DeadlineTimer;
pub use tt::TranspositionTable;
