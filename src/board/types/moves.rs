//! Move types and move list.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Index;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::castling::CastleSide;
use super::piece::{Color, Piece};
use super::square::Square;

const FROM_MASK: u32 = 0x3F;
const TO_SHIFT: u32 = 6;
const KIND_SHIFT: u32 = 12;
const SUB_SHIFT: u32 = 14;
const PIECE_SHIFT: u32 = 16;
const CAPTURED_SHIFT: u32 = 19;
const NO_CAPTURE: u32 = 7;
const IDENTITY_MASK: u32 = 0xFFFF;

/// Special-move kind stored in bits 12-13.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Normal = 0,
    Promotion = 1,
    EnPassant = 2,
    Castling = 3,
}

/// Packed move.
///
/// Encoding of `bits`:
/// - bits 0-5:   from square
/// - bits 6-11:  to square
/// - bits 12-13: [`MoveKind`]
/// - bits 14-15: sub-type; for promotions the new piece (0 = knight .. 3 = queen),
///   for castling the side (0 = king side, 1 = queen side), otherwise zero
/// - bits 16-18: moved piece
/// - bits 19-21: captured piece, 7 when nothing is captured
///
/// The low 16 bits form the move's identity: equality and hashing look only at
/// them, so the ordering `score` and the piece annotations never affect
/// comparisons. The identity is also what the transposition table stores.
#[derive(Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Move {
    bits: u32,
    score: i32,
}

impl Move {
    /// The null move (a1a1, normal). Never generated.
    pub const NULL: Move = Move { bits: 0, score: 0 };

    #[inline]
    const fn pack(from: Square, to: Square, kind: MoveKind, sub: u32, piece: Piece, captured: Option<Piece>) -> Self {
        let captured_bits = match captured {
            Some(p) => p as u32,
            None => NO_CAPTURE,
        };
        Move {
            bits: from.index() as u32
                | (to.index() as u32) << TO_SHIFT
                | (kind as u32) << KIND_SHIFT
                | sub << SUB_SHIFT
                | (piece as u32) << PIECE_SHIFT
                | captured_bits << CAPTURED_SHIFT,
            score: 0,
        }
    }

    /// A normal move or capture, including double pawn pushes
    #[inline]
    #[must_use]
    pub const fn normal(from: Square, to: Square, piece: Piece, captured: Option<Piece>) -> Self {
        Self::pack(from, to, MoveKind::Normal, 0, piece, captured)
    }

    /// A pawn promotion, optionally capturing. `promo` must be N, B, R or Q.
    #[inline]
    #[must_use]
    pub const fn promotion(from: Square, to: Square, promo: Piece, captured: Option<Piece>) -> Self {
        let sub = match promo {
            Piece::Knight => 0,
            Piece::Bishop => 1,
            Piece::Rook => 2,
            _ => 3,
        };
        Self::pack(from, to, MoveKind::Promotion, sub, Piece::Pawn, captured)
    }

    #[inline]
    #[must_use]
    pub const fn en_passant(from: Square, to: Square) -> Self {
        Self::pack(from, to, MoveKind::EnPassant, 0, Piece::Pawn, Some(Piece::Pawn))
    }

    /// Castling, encoded as the king's two-square move
    #[inline]
    #[must_use]
    pub const fn castle(color: Color, side: CastleSide) -> Self {
        let (king_from, king_to, _, _) = side.squares(color);
        let sub = match side {
            CastleSide::King => 0,
            CastleSide::Queen => 1,
        };
        Self::pack(king_from, king_to, MoveKind::Castling, sub, Piece::King, None)
    }

    /// Rebuild a move from its 16-bit identity. Piece annotations are lost.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u16) -> Self {
        Move {
            bits: raw as u32 | NO_CAPTURE << CAPTURED_SHIFT,
            score: 0,
        }
    }

    /// The 16-bit identity (from, to, kind, sub-type)
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u16 {
        (self.bits & IDENTITY_MASK) as u16
    }

    #[inline]
    #[must_use]
    pub const fn from(self) -> Square {
        Square::from_index((self.bits & FROM_MASK) as u8)
    }

    #[inline]
    #[must_use]
    pub const fn to(self) -> Square {
        Square::from_index(((self.bits >> TO_SHIFT) & FROM_MASK) as u8)
    }

    #[inline]
    #[must_use]
    pub const fn kind(self) -> MoveKind {
        match (self.bits >> KIND_SHIFT) & 3 {
            0 => MoveKind::Normal,
            1 => MoveKind::Promotion,
            2 => MoveKind::EnPassant,
            _ => MoveKind::Castling,
        }
    }

    #[inline]
    const fn sub(self) -> u32 {
        (self.bits >> SUB_SHIFT) & 3
    }

    /// The piece a pawn promotes to, if this is a promotion
    #[inline]
    #[must_use]
    pub const fn promotion_piece(self) -> Option<Piece> {
        match self.kind() {
            MoveKind::Promotion => Some(Piece::from_index(self.sub() as usize + 1)),
            _ => None,
        }
    }

    /// The castle side, if this is a castling move
    #[inline]
    #[must_use]
    pub const fn castle_side(self) -> Option<CastleSide> {
        match self.kind() {
            MoveKind::Castling if self.sub() == 0 => Some(CastleSide::King),
            MoveKind::Castling => Some(CastleSide::Queen),
            _ => None,
        }
    }

    /// The moving piece (pawn for promotions and en passant)
    #[inline]
    #[must_use]
    pub const fn piece(self) -> Piece {
        Piece::from_index(((self.bits >> PIECE_SHIFT) & 7) as usize)
    }

    /// The captured piece (pawn for en passant)
    #[inline]
    #[must_use]
    pub const fn captured(self) -> Option<Piece> {
        match (self.bits >> CAPTURED_SHIFT) & 7 {
            NO_CAPTURE => None,
            idx => Some(Piece::from_index(idx as usize)),
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_capture(self) -> bool {
        (self.bits >> CAPTURED_SHIFT) & 7 != NO_CAPTURE
    }

    #[inline]
    #[must_use]
    pub const fn is_promotion(self) -> bool {
        matches!(self.kind(), MoveKind::Promotion)
    }

    #[inline]
    #[must_use]
    pub const fn is_en_passant(self) -> bool {
        matches!(self.kind(), MoveKind::EnPassant)
    }

    #[inline]
    #[must_use]
    pub const fn is_castling(self) -> bool {
        matches!(self.kind(), MoveKind::Castling)
    }

    /// Neither a capture nor a promotion
    #[inline]
    #[must_use]
    pub const fn is_quiet(self) -> bool {
        !self.is_capture() && !self.is_promotion()
    }

    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.raw() == 0
    }

    /// Ordering score assigned by the move orderer
    #[inline]
    #[must_use]
    pub const fn score(self) -> i32 {
        self.score
    }

    #[inline]
    pub fn set_score(&mut self, score: i32) {
        self.score = score;
    }
}

impl PartialEq for Move {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.raw() == other.raw()
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw().hash(state);
    }
}

impl Default for Move {
    fn default() -> Self {
        Move::NULL
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({self}")?;
        if let Some(cap) = self.captured() {
            write!(f, " x{}", cap.to_char())?;
        }
        match self.kind() {
            MoveKind::Castling => write!(f, " castle")?,
            MoveKind::EnPassant => write!(f, " ep")?,
            _ => {}
        }
        write!(f, " score={})", self.score)
    }
}

/// Long algebraic (UCI) form, e.g. `e2e4`, `e7e8q`, `e1g1`
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return write!(f, "0000");
        }
        write!(f, "{}{}", self.from(), self.to())?;
        if let Some(promo) = self.promotion_piece() {
            write!(f, "{}", promo.to_char())?;
        }
        Ok(())
    }
}

pub(crate) const MAX_MOVES: usize = 256;
pub const MAX_PLY: usize = 128;

/// List of moves with fixed-size backing array.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    len: usize,
}

impl MoveList {
    #[must_use]
    pub fn new() -> Self {
        MoveList {
            moves: [Move::NULL; MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, mv: Move) {
        debug_assert!(self.len < MAX_MOVES);
        self.moves[self.len] = mv;
        self.len += 1;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    pub fn as_mut_slice(&mut self) -> &mut [Move] {
        &mut self.moves[..self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    #[must_use]
    pub fn first(&self) -> Option<Move> {
        self.as_slice().first().copied()
    }

    #[must_use]
    pub fn contains(&self, mv: Move) -> bool {
        self.iter().any(|m| *m == mv)
    }

    /// Find a generated move by identity, returning the fully annotated copy
    #[must_use]
    pub fn find(&self, mv: Move) -> Option<Move> {
        self.iter().find(|m| **m == mv).copied()
    }

    /// Selection step: swap the highest-scored move in `start..` into `start`
    /// and return it. Moves we never reach after a cutoff are never sorted.
    #[inline]
    pub fn pick_best(&mut self, start: usize) -> Option<Move> {
        if start >= self.len {
            return None;
        }
        let mut best_idx = start;
        let mut best_score = self.moves[start].score;
        for i in (start + 1)..self.len {
            if self.moves[i].score > best_score {
                best_score = self.moves[i].score;
                best_idx = i;
            }
        }
        self.moves.swap(start, best_idx);
        Some(self.moves[start])
    }

    /// Stable sort by descending score
    pub fn sort_by_score(&mut self) {
        self.as_mut_slice().sort_by(|a, b| b.score.cmp(&a.score));
    }
}

impl Default for MoveList {
    fn default() -> Self {
        MoveList::new()
    }
}

impl fmt::Debug for MoveList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl Index<usize> for MoveList {
    type Output = Move;

    fn index(&self, idx: usize) -> &Self::Output {
        assert!(
            idx < self.len,
            "MoveList index {} out of bounds (len {})",
            idx,
            self.len
        );
        &self.moves[idx]
    }
}
