//! Transposition table for caching search results.
//!
//! One entry per slot, indexed by the low bits of the Zobrist hash, and every
//! store overwrites whatever the slot held.
//!
//! Entries are stored as atomic u64 pairs using XOR verification so that
//! helper threads can share the table without locks: a torn read fails the
//! key check and behaves like a miss.

use std::mem;
use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::search::constants::{MATE_BOUND, MATE_SCORE};
use crate::board::Move;

pub const DEFAULT_TT_MB: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BoundType {
    /// Score is the exact value
    Exact,
    /// Score is at least this value (failed high)
    LowerBound,
    /// Score is at most this value (failed low)
    UpperBound,
}

impl BoundType {
    fn to_bits(self) -> u64 {
        match self {
            BoundType::Exact => 0,
            BoundType::LowerBound => 1,
            BoundType::UpperBound => 2,
        }
    }

    fn from_bits(v: u64) -> Self {
        match v & 0x3 {
            0 => BoundType::Exact,
            1 => BoundType::LowerBound,
            _ => BoundType::UpperBound,
        }
    }
}

/// Unpacked TT entry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TtEntry {
    /// Full hash of the position that wrote the entry
    pub key: u64,
    pub best_move: Option<Move>,
    pub depth: u8,
    pub bound: BoundType,
    pub score: i16,
}

impl TtEntry {
    #[must_use]
    pub fn depth(&self) -> i32 {
        i32::from(self.depth)
    }

    #[must_use]
    pub fn score(&self) -> i32 {
        i32::from(self.score)
    }
}

/// Packed entry format (fits in 64 bits):
/// - bits 0-15:  move identity (0 = no move)
/// - bits 16-31: score (i16 as u16)
/// - bits 32-39: depth
/// - bits 40-41: bound
/// - bit 48:     occupied flag, so a stored entry is never all zeros
const OCCUPIED: u64 = 1 << 48;

fn pack_entry(best_move: Option<Move>, score: i16, depth: u8, bound: BoundType) -> u64 {
    let mv = best_move.map_or(0, Move::raw);
    u64::from(mv)
        | u64::from(score as u16) << 16
        | u64::from(depth) << 32
        | bound.to_bits() << 40
        | OCCUPIED
}

fn unpack_entry(key: u64, data: u64) -> TtEntry {
    let mv_bits = (data & 0xFFFF) as u16;
    TtEntry {
        key,
        best_move: (mv_bits != 0).then(|| Move::from_raw(mv_bits)),
        score: ((data >> 16) & 0xFFFF) as u16 as i16,
        depth: ((data >> 32) & 0xFF) as u8,
        bound: BoundType::from_bits(data >> 40),
    }
}

/// A single slot: stores `key ^ data` and `data`.
#[repr(C)]
struct TtSlot {
    key_xor: AtomicU64,
    data: AtomicU64,
}

impl TtSlot {
    fn new() -> Self {
        TtSlot {
            key_xor: AtomicU64::new(0),
            data: AtomicU64::new(0),
        }
    }

    fn store(&self, hash: u64, packed: u64) {
        self.data.store(packed, Ordering::Relaxed);
        self.key_xor.store(hash ^ packed, Ordering::Relaxed);
    }

    fn load(&self) -> (u64, u64) {
        let key_xor = self.key_xor.load(Ordering::Relaxed);
        let data = self.data.load(Ordering::Relaxed);
        (key_xor ^ data, data)
    }

    fn is_empty(&self) -> bool {
        self.data.load(Ordering::Relaxed) == 0
    }

    fn clear(&self) {
        self.key_xor.store(0, Ordering::Relaxed);
        self.data.store(0, Ordering::Relaxed);
    }
}

/// Thread-safe, always-replace transposition table.
pub struct TranspositionTable {
    slots: Vec<TtSlot>,
    mask: usize,
}

impl TranspositionTable {
    /// Create a table of at most `size_mb` megabytes; the slot count is the
    /// largest power of two that fits.
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        let wanted = (size_mb * 1024 * 1024 / mem::size_of::<TtSlot>()).max(1);
        let count = 1usize << (usize::BITS - 1 - wanted.leading_zeros());
        let slots = (0..count).map(|_| TtSlot::new()).collect();
        TranspositionTable {
            slots,
            mask: count - 1,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    fn index(&self, hash: u64) -> usize {
        (hash as usize) & self.mask
    }

    /// The contents of the slot `hash` maps to, whoever wrote it.
    ///
    /// Returns `None` only for a never-written slot. Callers compare
    /// [`TtEntry::key`] against their hash before trusting the entry.
    #[must_use]
    pub fn get(&self, hash: u64) -> Option<TtEntry> {
        let (key, data) = self.slots[self.index(hash)].load();
        (data != 0).then(|| unpack_entry(key, data))
    }

    /// The entry for `hash` if its key verifies
    #[must_use]
    pub fn probe(&self, hash: u64) -> Option<TtEntry> {
        self.get(hash).filter(|entry| entry.key == hash)
    }

    /// Store an entry, replacing the slot unconditionally.
    ///
    /// `score` must already be converted with [`score_to_tt`].
    pub fn set(&self, hash: u64, depth: i32, score: i32, bound: BoundType, best_move: Option<Move>) {
        let depth = depth.clamp(0, i32::from(u8::MAX)) as u8;
        let score = score.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16;
        let best_move = best_move.filter(|mv| !mv.is_null());
        let packed = pack_entry(best_move, score, depth, bound);
        self.slots[self.index(hash)].store(hash, packed);
    }

    /// Returns table fullness in per mille (0-1000), sampled over the first
    /// 1000 slots.
    #[must_use]
    pub fn hashfull(&self) -> u32 {
        let sample = self.slots.len().min(1000);
        let used = self.slots[..sample].iter().filter(|slot| !slot.is_empty()).count();
        (used * 1000 / sample) as u32
    }

    /// Clear all entries from the table.
    pub fn clear(&self) {
        for slot in &self.slots {
            slot.clear();
        }
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        TranspositionTable::new(DEFAULT_TT_MB)
    }
}

/// Convert a search score to the form stored in the table: mate scores
/// become distance-to-mate from the storing node instead of from the root.
#[inline]
#[must_use]
pub fn score_to_tt(score: i32, ply: usize) -> i32 {
    let ply = ply as i32;
    if score >= MATE_BOUND {
        score + ply
    } else if score <= -MATE_BOUND {
        score - ply
    } else {
        score
    }
}

/// Inverse of [`score_to_tt`] for a node at `ply`
#[inline]
#[must_use]
pub fn score_from_tt(score: i32, ply: usize) -> i32 {
    let ply = ply as i32;
    if score >= MATE_BOUND {
        (score - ply).min(MATE_SCORE)
    } else if score <= -MATE_BOUND {
        (score + ply).max(-MATE_SCORE)
    } else {
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Piece, Square};

    fn some_move() -> Move {
        Move::normal(Square::from_index(12), Square::from_index(28), Piece::Pawn, None)
    }

    #[test]
    fn store_and_probe() {
        let tt = TranspositionTable::new(1);
        let hash = 0x1234_5678_9ABC_DEF0;
        tt.set(hash, 10, -500, BoundType::LowerBound, Some(some_move()));

        let entry = tt.probe(hash).expect("should find entry");
        assert_eq!(entry.depth(), 10);
        assert_eq!(entry.score(), -500);
        assert_eq!(entry.bound, BoundType::LowerBound);
        assert_eq!(entry.best_move, Some(some_move()));
    }

    #[test]
    fn get_returns_foreign_entry_but_probe_rejects_it() {
        let tt = TranspositionTable::new(1);
        let hash = 0x0000_0000_0000_0042;
        // Same low bits, different key
        let other = hash | 1 << 60;
        tt.set(other, 3, 7, BoundType::Exact, None);

        let entry = tt.get(hash).expect("slot written");
        assert_eq!(entry.key, other);
        assert!(tt.probe(hash).is_none());
        assert!(tt.probe(other).is_some());
    }

    #[test]
    fn always_replaces() {
        let tt = TranspositionTable::new(1);
        let hash = 0xDEAD_BEEF;
        tt.set(hash, 20, 100, BoundType::Exact, Some(some_move()));
        tt.set(hash, 1, 5, BoundType::UpperBound, None);
        let entry = tt.probe(hash).expect("present");
        assert_eq!(entry.depth(), 1);
        assert_eq!(entry.best_move, None);
    }

    #[test]
    fn size_is_power_of_two_and_clear_empties() {
        let tt = TranspositionTable::new(1);
        assert!(tt.len().is_power_of_two());
        assert_eq!(tt.len(), 1024 * 1024 / 16);
        assert_eq!(tt.hashfull(), 0);
        for i in 0..1000u64 {
            tt.set(i, 1, 0, BoundType::Exact, None);
        }
        assert_eq!(tt.hashfull(), 1000);
        tt.clear();
        assert_eq!(tt.hashfull(), 0);
        assert!(tt.get(5).is_none());
    }

    #[test]
    fn mate_scores_are_rebased_by_ply() {
        // Mate in 3 plies from a node at ply 4 is mate in 7 from the root
        let root_score = MATE_SCORE - 7;
        let stored = score_to_tt(root_score, 4);
        assert_eq!(stored, MATE_SCORE - 3);
        // Read back at ply 2 the same node is mate in 5 from that root
        assert_eq!(score_from_tt(stored, 2), MATE_SCORE - 5);
        assert_eq!(score_from_tt(score_to_tt(-root_score, 4), 4), -root_score);
        assert_eq!(score_to_tt(150, 9), 150);
    }
}
