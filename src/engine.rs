//! Engine façade: set a position, search it, report the best move.
//!
//! Wraps a [`Searcher`] together with the game position and an opening book.
//! Protocol front ends drive the engine through this type only.

use log::info;
use thiserror::Error;

use crate::board::{
    ClassicalEval, Evaluator, FenError, Move, MoveParseError, Position, SanError, SearchInfoCallback,
    SearchLimits, SearchOutcome, SearchParams, Searcher, STARTPOS_FEN,
};
use crate::book::{NoBook, OpeningBook};
use crate::sync::{StopFlag, Timer};
use crate::timer::DeadlineTimer;
use crate::tt::DEFAULT_TT_MB;

/// Errors from driving the engine with external input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid position: {0}")]
    Fen(#[from] FenError),
    #[error("invalid move: {0}")]
    Move(#[from] MoveParseError),
    #[error("invalid move: {0}")]
    San(#[from] SanError),
}

/// Engine settings
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Transposition table size in megabytes
    pub tt_mb: usize,
    /// Search threads including the main one
    pub threads: usize,
    pub params: SearchParams,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            tt_mb: DEFAULT_TT_MB,
            threads: 1,
            params: SearchParams::default(),
        }
    }
}

/// A game position plus everything needed to search it
pub struct Engine<E = ClassicalEval> {
    position: Position,
    /// Whether the game started from the standard position (book lookups)
    from_startpos: bool,
    searcher: Searcher<E>,
    config: EngineConfig,
    book: Box<dyn OpeningBook>,
    stop: StopFlag,
    last: Option<SearchOutcome>,
}

impl Engine<ClassicalEval> {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self::with_evaluator(config, ClassicalEval)
    }
}

impl Default for Engine<ClassicalEval> {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl<E: Evaluator + Clone> Engine<E> {
    #[must_use]
    pub fn with_evaluator(config: EngineConfig, evaluator: E) -> Self {
        let mut searcher = Searcher::new(evaluator);
        searcher.resize_tt(config.tt_mb);
        searcher.set_threads(config.threads);
        searcher.set_params(config.params.clone());
        Engine {
            position: Position::startpos(),
            from_startpos: true,
            searcher,
            config,
            book: Box::new(NoBook),
            stop: StopFlag::new(),
            last: None,
        }
    }

    /// Apply new settings. Resizing drops the table contents.
    pub fn configure(&mut self, config: EngineConfig) {
        if config.tt_mb != self.config.tt_mb {
            self.searcher.resize_tt(config.tt_mb);
        }
        self.searcher.set_threads(config.threads);
        self.searcher.set_params(config.params.clone());
        self.config = config;
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn set_book(&mut self, book: impl OpeningBook + 'static) {
        self.book = Box::new(book);
    }

    pub fn set_info_callback(&mut self, callback: Option<SearchInfoCallback>) {
        self.searcher.set_info_callback(callback);
    }

    /// Set the game position from a FEN (or `"startpos"`) followed by moves
    /// in long algebraic notation.
    ///
    /// The current position is untouched when any part fails.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Fen`] for a malformed FEN and
    /// [`EngineError::Move`] for the first malformed or illegal move.
    pub fn set_position(&mut self, fen: &str, moves: &[&str]) -> Result<(), EngineError> {
        let fen = fen.trim();
        let (mut position, from_startpos) = if fen == "startpos" {
            (Position::startpos(), true)
        } else {
            (Position::from_fen(fen)?, fen == STARTPOS_FEN)
        };
        for notation in moves {
            position.apply_uci(notation)?;
        }
        self.position = position;
        self.from_startpos = from_startpos;
        self.last = None;
        Ok(())
    }

    /// Play one more move, given in long algebraic or standard algebraic
    /// notation.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::San`] when neither notation matches a legal move.
    pub fn play(&mut self, notation: &str) -> Result<Move, EngineError> {
        let mv = match self.position.parse_uci(notation) {
            Ok(mv) => mv,
            Err(_) => self.position.parse_san(notation)?,
        };
        self.position.apply(mv);
        self.last = None;
        Ok(mv)
    }

    /// Start a new game: back to the standard position with empty tables
    pub fn new_game(&mut self) {
        self.position = Position::startpos();
        self.from_startpos = true;
        self.searcher.clear();
        self.last = None;
    }

    /// Search the current position.
    ///
    /// A book move, when the book has one for this game, is returned without
    /// searching. A `movetime` limit arms a deadline timer that shares the
    /// engine's stop flag, so [`Engine::stop_handle`] works either way.
    pub fn search(&mut self, limits: &SearchLimits) -> SearchOutcome {
        if let Some(outcome) = self.book_outcome() {
            self.last = Some(outcome.clone());
            return outcome;
        }

        let outcome = match limits.movetime {
            Some(budget) => {
                let timer = DeadlineTimer::with_flag(budget, self.stop.clone());
                timer.start();
                let outcome = self.searcher.search(&mut self.position, limits, &timer);
                timer.stop();
                outcome
            }
            None => {
                self.stop.start();
                self.searcher.search(&mut self.position, limits, &self.stop)
            }
        };
        self.last = Some(outcome.clone());
        outcome
    }

    /// Book move for the current game, checked against the legal moves
    fn book_outcome(&self) -> Option<SearchOutcome> {
        if !self.from_startpos {
            return None;
        }
        let requested = self.book.request(&self.position.played_moves())?;
        let mv = self.position.generate_moves().find(requested)?;
        info!("book move {mv}");
        Some(SearchOutcome {
            best_move: Some(mv),
            pv: vec![mv],
            ..SearchOutcome::default()
        })
    }

    /// Best move of the last search since the position was set
    #[must_use]
    pub fn best_move(&self) -> Option<Move> {
        self.last.as_ref().and_then(|outcome| outcome.best_move)
    }

    #[must_use]
    pub fn last_outcome(&self) -> Option<&SearchOutcome> {
        self.last.as_ref()
    }

    /// Handle that stops a running search from another thread
    #[must_use]
    pub fn stop_handle(&self) -> StopFlag {
        self.stop.clone()
    }

    #[must_use]
    pub fn position(&self) -> &Position {
        &self.position
    }

    #[must_use]
    pub fn searcher(&self) -> &Searcher<E> {
        &self.searcher
    }
}
