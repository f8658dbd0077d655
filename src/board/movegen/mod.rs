//! Legal move generation.
//!
//! Moves are generated strictly legal in one pass: the checkers and pinned
//! pieces are computed once per call, then every piece generator intersects its
//! targets with the check block mask and, for pinned pieces, the pin line.
//! Only king moves and en passant need an extra attack test.

mod kings;
mod knights;
mod pawns;
mod sliders;

use super::attack_tables::{between, line, xray_bishop_attacks, xray_rook_attacks};
use super::{Bitboard, Color, Move, MoveList, Piece, Position, Square};

/// Which moves a generation pass emits
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum GenMode {
    /// Every legal move
    All,
    /// Legal captures plus every promotion
    Captures,
}

/// Check and pin information for the side to move. Built per call, never stored.
pub(crate) struct Constraints {
    pub(crate) us: Color,
    pub(crate) them: Color,
    pub(crate) king: Square,
    pub(crate) own: Bitboard,
    pub(crate) enemy: Bitboard,
    pub(crate) occupied: Bitboard,
    pub(crate) checkers: Bitboard,
    /// Squares a non-king move must land on: everything when not in check,
    /// otherwise the checker and the squares between it and the king
    pub(crate) block: Bitboard,
    pub(crate) pinned_orth: Bitboard,
    pub(crate) pinned_diag: Bitboard,
}

impl Constraints {
    pub(crate) fn new(pos: &Position) -> Self {
        let us = pos.side_to_move();
        let them = !us;
        let king = pos.king_square(us);
        let own = pos.color_bb(us);
        let enemy = pos.color_bb(them);
        let occupied = own | enemy;
        let checkers = pos.attackers_to(king, occupied) & enemy;

        let block = match checkers.popcount() {
            0 => Bitboard::ALL,
            1 => between(king, checkers.lsb()),
            _ => Bitboard::EMPTY,
        };

        let queens = pos.pieces_of(them, Piece::Queen);
        let orth_sliders = pos.pieces_of(them, Piece::Rook) | queens;
        let diag_sliders = pos.pieces_of(them, Piece::Bishop) | queens;

        let mut pinned_orth = Bitboard::EMPTY;
        for pinner in xray_rook_attacks(king, occupied, own) & orth_sliders {
            pinned_orth |= between(king, pinner) & own;
        }
        let mut pinned_diag = Bitboard::EMPTY;
        for pinner in xray_bishop_attacks(king, occupied, own) & diag_sliders {
            pinned_diag |= between(king, pinner) & own;
        }

        Constraints {
            us,
            them,
            king,
            own,
            enemy,
            occupied,
            checkers,
            block,
            pinned_orth,
            pinned_diag,
        }
    }

    #[inline]
    pub(crate) fn pinned(&self) -> Bitboard {
        self.pinned_orth | self.pinned_diag
    }

    /// Squares a piece on `from` may move to without exposing the king
    #[inline]
    pub(crate) fn pin_ray(&self, from: Square) -> Bitboard {
        if self.pinned().contains(from) {
            line(self.king, from)
        } else {
            Bitboard::ALL
        }
    }

    #[inline]
    pub(crate) fn in_double_check(&self) -> bool {
        self.checkers.has_many()
    }

    /// Destination mask for knights, sliders and the king in the given mode
    #[inline]
    pub(crate) fn targets(&self, mode: GenMode) -> Bitboard {
        match mode {
            GenMode::All => !self.own,
            GenMode::Captures => self.enemy,
        }
    }
}

impl Position {
    /// All legal moves for the side to move
    #[must_use]
    pub fn generate_moves(&self) -> MoveList {
        self.generate(GenMode::All)
    }

    /// Legal captures (including en passant) and every legal promotion.
    ///
    /// Always a subset of [`Position::generate_moves`].
    #[must_use]
    pub fn generate_captures(&self) -> MoveList {
        self.generate(GenMode::Captures)
    }

    pub(crate) fn generate(&self, mode: GenMode) -> MoveList {
        let mut moves = MoveList::new();
        let ctx = Constraints::new(self);

        self.king_moves(&ctx, mode, &mut moves);
        if ctx.in_double_check() {
            return moves;
        }
        self.pawn_moves(&ctx, mode, &mut moves);
        self.knight_moves(&ctx, mode, &mut moves);
        self.slider_moves(&ctx, mode, &mut moves);
        if mode == GenMode::All && ctx.checkers.is_empty() {
            self.castling_moves(&ctx, &mut moves);
        }
        moves
    }

    /// Whether the side to move has at least one legal move
    #[must_use]
    pub fn has_legal_moves(&self) -> bool {
        !self.generate_moves().is_empty()
    }

    #[must_use]
    pub fn is_checkmate(&self) -> bool {
        self.in_check() && !self.has_legal_moves()
    }

    #[must_use]
    pub fn is_stalemate(&self) -> bool {
        !self.in_check() && !self.has_legal_moves()
    }

    /// Whether `mv` is among the legal moves of this position
    #[must_use]
    pub fn is_legal(&self, mv: Move) -> bool {
        !mv.is_null() && self.generate_moves().contains(mv)
    }

    /// Piece of the side not to move on `sq`, if any
    #[inline]
    pub(crate) fn captured_on(&self, ctx: &Constraints, sq: Square) -> Option<Piece> {
        if ctx.enemy.contains(sq) {
            self.piece_on(sq)
        } else {
            None
        }
    }

    /// Push one move per target square for a non-pawn piece
    #[inline]
    pub(crate) fn push_targets(
        &self,
        ctx: &Constraints,
        piece: Piece,
        from: Square,
        targets: Bitboard,
        moves: &mut MoveList,
    ) {
        for to in targets {
            moves.push(Move::normal(from, to, piece, self.captured_on(ctx, to)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(fen: &str) -> Position {
        Position::from_fen(fen).expect("valid fen")
    }

    #[test]
    fn pins_are_split_by_direction() {
        // Rook pin on e-file, bishop pin on the a5-e1 diagonal
        let board = pos("4r1k1/8/8/b7/8/8/3NN3/4K3 w - - 0 1");
        let ctx = Constraints::new(&board);
        assert!(ctx.pinned_orth.contains("e2".parse().expect("square")));
        assert!(ctx.pinned_diag.contains("d2".parse().expect("square")));
        // Both knights are frozen: only king moves remain
        assert!(board.generate_moves().iter().all(|mv| mv.piece() == Piece::King));
    }

    #[test]
    fn double_check_allows_only_king_moves() {
        let board = pos("4k3/8/8/8/8/5n2/8/r3K2R w K - 0 1");
        let ctx = Constraints::new(&board);
        assert!(ctx.in_double_check());
        let moves = board.generate_moves();
        assert!(!moves.is_empty());
        assert!(moves.iter().all(|mv| mv.piece() == Piece::King && !mv.is_castling()));
    }

    #[test]
    fn single_check_forces_block_capture_or_king_move() {
        // Rook gives check along the e-file; the bishop can block on e3
        let board = pos("4r1k1/8/8/8/8/8/3B4/6K1 w - - 0 1");
        assert!(!board.in_check());
        let board = pos("4r1k1/8/8/8/8/8/3B4/4K3 w - - 0 1");
        let moves = board.generate_moves();
        let bishop_moves: Vec<String> = moves
            .iter()
            .filter(|mv| mv.piece() == Piece::Bishop)
            .map(ToString::to_string)
            .collect();
        assert_eq!(bishop_moves, vec!["d2e3".to_string()]);
    }

    #[test]
    fn captures_are_subset_and_include_quiet_promotions() {
        let board = pos("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        let captures = board.generate_captures();
        let all = board.generate_moves();
        // a8=Q/R/B/N and axb8=Q/R/B/N
        assert_eq!(captures.len(), 8);
        assert!(captures.iter().all(|mv| all.contains(*mv)));
        assert!(captures.iter().all(|mv| mv.is_promotion()));
    }

    #[test]
    fn checkmate_and_stalemate() {
        let mated = pos("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
        assert!(mated.is_checkmate());
        let stalemate = pos("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        assert!(stalemate.is_stalemate());
        assert!(!stalemate.is_checkmate());
    }
}
