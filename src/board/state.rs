use super::attack_tables::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks,
};
use super::eval::pst::{MATERIAL_EG, MATERIAL_MG, PHASE_WEIGHTS, PST_EG, PST_MG};
use super::{Bitboard, CastlingRights, Color, Move, Piece, Square};

/// Saved state needed to reverse one `apply` or `apply_null`.
///
/// Everything that cannot be recomputed from the move itself is stored here,
/// and undo restores these values rather than recomputing them.
#[derive(Clone, Copy, Debug)]
pub struct HistoryEntry {
    pub(crate) mv: Move,
    pub(crate) captured: Option<Piece>,
    pub(crate) castling: CastlingRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) hash: u64,
    pub(crate) halfmove_clock: u32,
    pub(crate) null: bool,
}

impl HistoryEntry {
    /// The move that was applied (`Move::NULL` for a null move)
    #[must_use]
    pub fn mv(&self) -> Move {
        self.mv
    }

    /// Hash of the position before the move
    #[must_use]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.null
    }
}

/// A chess position with its own move history.
///
/// Pieces live in two color masks and six piece-type masks. Material and
/// piece-square subtotals are kept up to date by every piece placement so the
/// evaluator never rescans the board.
#[derive(Clone, Debug)]
pub struct Position {
    pub(crate) colors: [Bitboard; 2],
    pub(crate) pieces: [Bitboard; 6],
    pub(crate) side_to_move: Color,
    pub(crate) castling: CastlingRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
    pub(crate) hash: u64,
    // Incremental evaluation, per color
    pub(crate) material: [i32; 2],
    pub(crate) psq_mg: [i32; 2],
    pub(crate) psq_eg: [i32; 2],
    pub(crate) phase: [i32; 2],
    pub(crate) history: Vec<HistoryEntry>,
}

impl Position {
    /// A board with no pieces, White to move and no rights
    pub(crate) fn empty() -> Self {
        Position {
            colors: [Bitboard::EMPTY; 2],
            pieces: [Bitboard::EMPTY; 6],
            side_to_move: Color::White,
            castling: CastlingRights::none(),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            hash: 0,
            material: [0; 2],
            psq_mg: [0; 2],
            psq_eg: [0; 2],
            phase: [0; 2],
            history: Vec::with_capacity(256),
        }
    }

    /// The standard starting position
    #[must_use]
    pub fn startpos() -> Self {
        let mut pos = Position::empty();
        let back_rank = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        for (file, piece) in back_rank.into_iter().enumerate() {
            let file = file as u8;
            pos.put_piece(Color::White, piece, Square::new(0, file));
            pos.put_piece(Color::White, Piece::Pawn, Square::new(1, file));
            pos.put_piece(Color::Black, Piece::Pawn, Square::new(6, file));
            pos.put_piece(Color::Black, piece, Square::new(7, file));
        }
        pos.castling = CastlingRights::all();
        pos.hash = pos.compute_hash();
        pos
    }

    #[inline]
    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    #[must_use]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    #[inline]
    #[must_use]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    #[must_use]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    #[must_use]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Zobrist hash of the current position
    #[inline]
    #[must_use]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// All pieces of one color
    #[inline]
    #[must_use]
    pub fn color_bb(&self, color: Color) -> Bitboard {
        self.colors[color.index()]
    }

    /// All pieces of one type, both colors
    #[inline]
    #[must_use]
    pub fn piece_bb(&self, piece: Piece) -> Bitboard {
        self.pieces[piece.index()]
    }

    #[inline]
    #[must_use]
    pub fn pieces_of(&self, color: Color, piece: Piece) -> Bitboard {
        self.colors[color.index()] & self.pieces[piece.index()]
    }

    #[inline]
    #[must_use]
    pub fn occupied(&self) -> Bitboard {
        self.colors[0] | self.colors[1]
    }

    #[must_use]
    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        Piece::ALL
            .into_iter()
            .find(|piece| self.pieces[piece.index()].contains(sq))
    }

    #[must_use]
    pub fn color_on(&self, sq: Square) -> Option<Color> {
        Color::BOTH
            .into_iter()
            .find(|color| self.colors[color.index()].contains(sq))
    }

    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        Some((self.color_on(sq)?, self.piece_on(sq)?))
    }

    #[inline]
    #[must_use]
    pub fn king_square(&self, color: Color) -> Square {
        self.pieces_of(color, Piece::King).lsb()
    }

    /// Number of entries on the history stack
    #[inline]
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    #[must_use]
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Moves played since the position was set up, oldest first. Null moves are skipped.
    #[must_use]
    pub fn played_moves(&self) -> Vec<Move> {
        self.history
            .iter()
            .filter(|entry| !entry.null)
            .map(|entry| entry.mv)
            .collect()
    }

    #[must_use]
    pub fn last_move(&self) -> Option<Move> {
        self.history.last().filter(|entry| !entry.null).map(|entry| entry.mv)
    }

    /// Pieces of either color attacking `sq`, given `occupancy` for slider blocking
    #[must_use]
    pub fn attackers_to(&self, sq: Square, occupancy: Bitboard) -> Bitboard {
        let rooks = self.pieces[Piece::Rook.index()] | self.pieces[Piece::Queen.index()];
        let bishops = self.pieces[Piece::Bishop.index()] | self.pieces[Piece::Queen.index()];
        (pawn_attacks(Color::White, sq) & self.pieces_of(Color::Black, Piece::Pawn))
            | (pawn_attacks(Color::Black, sq) & self.pieces_of(Color::White, Piece::Pawn))
            | (knight_attacks(sq) & self.pieces[Piece::Knight.index()])
            | (king_attacks(sq) & self.pieces[Piece::King.index()])
            | (rook_attacks(sq, occupancy) & rooks)
            | (bishop_attacks(sq, occupancy) & bishops)
    }

    /// Whether any piece of color `by` attacks `sq` under `occupancy`
    #[must_use]
    pub fn is_attacked(&self, sq: Square, by: Color, occupancy: Bitboard) -> bool {
        let them = self.colors[by.index()];
        if (pawn_attacks(!by, sq) & self.pieces[Piece::Pawn.index()] & them).is_nonempty()
            || (knight_attacks(sq) & self.pieces[Piece::Knight.index()] & them).is_nonempty()
            || (king_attacks(sq) & self.pieces[Piece::King.index()] & them).is_nonempty()
        {
            return true;
        }
        let queens = self.pieces[Piece::Queen.index()];
        let rooks = (self.pieces[Piece::Rook.index()] | queens) & them;
        let bishops = (self.pieces[Piece::Bishop.index()] | queens) & them;
        (rook_attacks(sq, occupancy) & rooks).is_nonempty()
            || (bishop_attacks(sq, occupancy) & bishops).is_nonempty()
    }

    /// Enemy pieces giving check to the side to move
    #[must_use]
    pub fn checkers(&self) -> Bitboard {
        let us = self.side_to_move;
        let king = self.king_square(us);
        self.attackers_to(king, self.occupied()) & self.colors[(!us).index()]
    }

    #[inline]
    #[must_use]
    pub fn in_check(&self) -> bool {
        let us = self.side_to_move;
        self.is_attacked(self.king_square(us), !us, self.occupied())
    }

    /// Whether `color` has anything besides pawns and the king
    #[must_use]
    pub fn has_non_pawn_material(&self, color: Color) -> bool {
        let pieces = self.pieces[Piece::Knight.index()]
            | self.pieces[Piece::Bishop.index()]
            | self.pieces[Piece::Rook.index()]
            | self.pieces[Piece::Queen.index()];
        (pieces & self.colors[color.index()]).is_nonempty()
    }

    /// Sum of piece values for `color`, king excluded
    #[inline]
    #[must_use]
    pub fn material(&self, color: Color) -> i32 {
        self.material[color.index()]
    }

    /// Material plus piece-square totals (middlegame, endgame) for `color`
    #[inline]
    #[must_use]
    pub fn psq(&self, color: Color) -> (i32, i32) {
        (self.psq_mg[color.index()], self.psq_eg[color.index()])
    }

    /// Game phase: 24 with all minor and major pieces on the board, 0 with none
    #[inline]
    #[must_use]
    pub fn game_phase(&self) -> i32 {
        self.phase[0] + self.phase[1]
    }

    /// Fifty-move rule, repetition, or insufficient material
    #[must_use]
    pub fn is_draw(&self) -> bool {
        self.halfmove_clock >= 100 || self.is_repetition() || self.is_insufficient_material()
    }

    /// True when the current position already occurred with only reversible,
    /// non-null moves played since.
    #[must_use]
    pub fn is_repetition(&self) -> bool {
        let len = self.history.len();
        let reach = (self.halfmove_clock as usize).min(len);
        for back in 1..=reach {
            let entry = &self.history[len - back];
            // A null move or a rights change separates otherwise equal positions
            if entry.null || entry.castling != self.castling {
                return false;
            }
            if back % 2 == 0 && entry.hash == self.hash {
                return true;
            }
        }
        false
    }

    /// Bare kings, or a single minor piece against a bare king
    #[must_use]
    pub fn is_insufficient_material(&self) -> bool {
        let heavy = self.pieces[Piece::Pawn.index()]
            | self.pieces[Piece::Rook.index()]
            | self.pieces[Piece::Queen.index()];
        if heavy.is_nonempty() {
            return false;
        }
        let minors = self.pieces[Piece::Knight.index()] | self.pieces[Piece::Bishop.index()];
        minors.popcount() <= 1
    }

    /// Check the bitboard invariants: no square carries two piece types or two
    /// colors, the color and type masks cover the same squares, each side has
    /// exactly one king, and the incremental hash matches a full recompute.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        if (self.colors[0] & self.colors[1]).is_nonempty() {
            return false;
        }
        let mut union = Bitboard::EMPTY;
        for (i, a) in self.pieces.iter().enumerate() {
            for b in &self.pieces[i + 1..] {
                if (*a & *b).is_nonempty() {
                    return false;
                }
            }
            union |= *a;
        }
        union == self.occupied()
            && Color::BOTH
                .into_iter()
                .all(|c| self.pieces_of(c, Piece::King).popcount() == 1)
            && self.hash == self.compute_hash()
    }

    /// Add the incremental evaluation terms of one piece
    #[inline]
    pub(crate) fn add_piece_terms(&mut self, color: Color, piece: Piece, sq: Square) {
        let c = color.index();
        let p = piece.index();
        let pst_sq = pst_square(color, sq);
        if piece != Piece::King {
            self.material[c] += piece.value();
        }
        self.psq_mg[c] += MATERIAL_MG[p] + PST_MG[p][pst_sq];
        self.psq_eg[c] += MATERIAL_EG[p] + PST_EG[p][pst_sq];
        self.phase[c] += PHASE_WEIGHTS[p];
    }

    #[inline]
    pub(crate) fn sub_piece_terms(&mut self, color: Color, piece: Piece, sq: Square) {
        let c = color.index();
        let p = piece.index();
        let pst_sq = pst_square(color, sq);
        if piece != Piece::King {
            self.material[c] -= piece.value();
        }
        self.psq_mg[c] -= MATERIAL_MG[p] + PST_MG[p][pst_sq];
        self.psq_eg[c] -= MATERIAL_EG[p] + PST_EG[p][pst_sq];
        self.phase[c] -= PHASE_WEIGHTS[p];
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::startpos()
    }
}

/// Piece-square table index: White reads the table directly, Black mirrored
#[inline]
fn pst_square(color: Color, sq: Square) -> usize {
    match color {
        Color::White => sq.index(),
        Color::Black => sq.flip().index(),
    }
}
