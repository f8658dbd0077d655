//! Opening-book collaborator.
//!
//! The engine asks the book before searching; the search itself never sees
//! it. [`LineBook`] is an in-memory book built from opening lines written as
//! UCI moves from the standard starting position.

use std::collections::HashMap;

use rand::Rng;

use crate::board::{Move, MoveParseError, Position};

/// Source of opening moves keyed by the moves played so far.
pub trait OpeningBook: Send {
    /// A book move for the game that started from the standard position and
    /// continued with `history`, if the book knows one
    fn request(&self, history: &[Move]) -> Option<Move>;
}

/// A book that never has a move
#[derive(Clone, Copy, Debug, Default)]
pub struct NoBook;

impl OpeningBook for NoBook {
    fn request(&self, _history: &[Move]) -> Option<Move> {
        None
    }
}

/// Continuation with the number of lines that played it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BookMove {
    pub mv: Move,
    pub weight: u32,
}

/// In-memory book of opening lines.
///
/// Every prefix of every line becomes a key; when several lines continue a
/// prefix differently the choice is random, weighted by how many lines play
/// each continuation.
#[derive(Clone, Debug, Default)]
pub struct LineBook {
    by_prefix: HashMap<Vec<u16>, Vec<BookMove>>,
}

impl LineBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a book from one line per row, moves separated by whitespace.
    /// Blank rows and rows starting with `#` are skipped.
    ///
    /// # Errors
    ///
    /// Fails on the first move that is malformed or illegal in its line.
    pub fn from_lines(text: &str) -> Result<Self, MoveParseError> {
        let mut book = LineBook::new();
        for line in text.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            book.add_line(line)?;
        }
        Ok(book)
    }

    /// Add one line of UCI moves from the starting position.
    ///
    /// # Errors
    ///
    /// Fails on the first malformed or illegal move; moves before it are kept.
    pub fn add_line(&mut self, line: &str) -> Result<(), MoveParseError> {
        let mut pos = Position::startpos();
        let mut prefix = Vec::new();
        for token in line.split_whitespace() {
            let mv = pos.apply_uci(token)?;
            let row = self.by_prefix.entry(prefix.clone()).or_default();
            match row.iter_mut().find(|entry| entry.mv == mv) {
                Some(entry) => entry.weight = entry.weight.saturating_add(1),
                None => row.push(BookMove { mv, weight: 1 }),
            }
            prefix.push(mv.raw());
        }
        Ok(())
    }

    /// Number of distinct positions (move prefixes) in the book
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_prefix.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_prefix.is_empty()
    }

    /// Every continuation the book knows after `history`
    #[must_use]
    pub fn continuations(&self, history: &[Move]) -> &[BookMove] {
        let key: Vec<u16> = history.iter().map(|mv| mv.raw()).collect();
        self.by_prefix.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Weighted random pick among the continuations, using `rng`
    pub fn request_with<R: Rng + ?Sized>(&self, history: &[Move], rng: &mut R) -> Option<Move> {
        let row = self.continuations(history);
        let total: u32 = row.iter().map(|entry| entry.weight).sum();
        if total == 0 {
            return None;
        }
        let mut pick = rng.gen_range(0..total);
        for entry in row {
            if pick < entry.weight {
                return Some(entry.mv);
            }
            pick -= entry.weight;
        }
        None
    }
}

impl OpeningBook for LineBook {
    fn request(&self, history: &[Move]) -> Option<Move> {
        self.request_with(history, &mut rand::thread_rng())
    }
}
