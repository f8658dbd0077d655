use std::fmt;
use std::str::FromStr;

use super::error::{FenError, MoveParseError};
use super::{Bitboard, CastleSide, CastlingRights, Color, Move, Piece, Position, Square};

pub const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl Position {
    /// Parse a position from FEN notation.
    ///
    /// The half-move clock and full-move number are optional and default to
    /// `0 1`. Castling rights whose king or rook is not on its home square are
    /// dropped.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let mut pos = Position::empty();
        let parts: Vec<&str> = fen.split_whitespace().collect();

        if parts.len() < 4 {
            return Err(FenError::TooFewParts { found: parts.len() });
        }
        if parts.len() > 6 {
            return Err(FenError::TooManyParts { found: parts.len() });
        }

        // Piece placement, rank 8 first
        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::WrongRankCount { found: ranks.len() });
        }
        for (row, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - row as u8;
            let mut file = 0usize;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                    file += skip as usize;
                    continue;
                }
                let piece = Piece::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                if file >= 8 {
                    return Err(FenError::BadRankWidth {
                        rank: row,
                        files: file + 1,
                    });
                }
                let color = if c.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                pos.put_piece(color, piece, Square::new(rank, file as u8));
                file += 1;
            }
            if file != 8 {
                return Err(FenError::BadRankWidth { rank: row, files: file });
            }
        }

        for color in Color::BOTH {
            let kings = pos.pieces_of(color, Piece::King).popcount();
            if kings != 1 {
                return Err(FenError::KingCount { color, found: kings });
            }
        }
        let back_ranks = Bitboard::RANK_1 | Bitboard::RANK_8;
        if (pos.piece_bb(Piece::Pawn) & back_ranks).is_nonempty() {
            return Err(FenError::PawnOnBackRank);
        }

        pos.side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        if parts[2] != "-" {
            for c in parts[2].chars() {
                match c {
                    'K' => pos.castling.set(Color::White, CastleSide::King),
                    'Q' => pos.castling.set(Color::White, CastleSide::Queen),
                    'k' => pos.castling.set(Color::Black, CastleSide::King),
                    'q' => pos.castling.set(Color::Black, CastleSide::Queen),
                    _ => return Err(FenError::InvalidCastling { char: c }),
                }
            }
        }
        pos.castling = pos.sanitized_castling();

        pos.en_passant = match parts[3] {
            "-" => None,
            field => {
                let invalid = || FenError::InvalidEnPassant {
                    found: field.to_string(),
                };
                let sq: Square = field.parse().map_err(|_| invalid())?;
                // Target, the pushed pawn's square and its start square
                let (expected_rank, victim_rank, origin_rank) = match pos.side_to_move {
                    Color::White => (5, 4, 6),
                    Color::Black => (2, 3, 1),
                };
                if sq.rank() != expected_rank {
                    return Err(invalid());
                }
                let victim = Square::new(victim_rank, sq.file());
                let origin = Square::new(origin_rank, sq.file());
                let occupied = pos.occupied();
                if !pos.pieces_of(!pos.side_to_move, Piece::Pawn).contains(victim)
                    || occupied.contains(sq)
                    || occupied.contains(origin)
                {
                    return Err(invalid());
                }
                Some(sq)
            }
        };

        if let Some(field) = parts.get(4) {
            pos.halfmove_clock = field.parse().map_err(|_| FenError::InvalidCounter {
                found: field.to_string(),
            })?;
        }
        if let Some(field) = parts.get(5) {
            pos.fullmove_number = field
                .parse::<u32>()
                .map_err(|_| FenError::InvalidCounter {
                    found: field.to_string(),
                })?
                .max(1);
        }

        let them = !pos.side_to_move;
        if pos.is_attacked(pos.king_square(them), pos.side_to_move, pos.occupied()) {
            return Err(FenError::OpponentInCheck);
        }

        pos.hash = pos.compute_hash();
        Ok(pos)
    }

    /// Rights restricted to those whose king and rook still stand at home
    fn sanitized_castling(&self) -> CastlingRights {
        let mut rights = CastlingRights::none();
        for color in Color::BOTH {
            for side in [CastleSide::King, CastleSide::Queen] {
                let (king, _, rook, _) = side.squares(color);
                if self.castling.has(color, side)
                    && self.pieces_of(color, Piece::King).contains(king)
                    && self.pieces_of(color, Piece::Rook).contains(rook)
                {
                    rights.set(color, side);
                }
            }
        }
        rights
    }

    /// Convert the position to FEN notation.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut rows: Vec<String> = Vec::with_capacity(8);
        for rank in (0..8).rev() {
            let mut row = String::new();
            let mut empty = 0;
            for file in 0..8 {
                let sq = Square::new(rank, file);
                if let Some((color, piece)) = self.piece_at(sq) {
                    if empty > 0 {
                        row.push_str(&empty.to_string());
                        empty = 0;
                    }
                    row.push(piece.to_fen_char(color));
                } else {
                    empty += 1;
                }
            }
            if empty > 0 {
                row.push_str(&empty.to_string());
            }
            rows.push(row);
        }

        let active = match self.side_to_move {
            Color::White => "w",
            Color::Black => "b",
        };
        let mut castling = String::new();
        for (color, side, c) in [
            (Color::White, CastleSide::King, 'K'),
            (Color::White, CastleSide::Queen, 'Q'),
            (Color::Black, CastleSide::King, 'k'),
            (Color::Black, CastleSide::Queen, 'q'),
        ] {
            if self.castling.has(color, side) {
                castling.push(c);
            }
        }
        if castling.is_empty() {
            castling.push('-');
        }
        let en_passant = self
            .en_passant
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());

        format!(
            "{} {} {} {} {} {}",
            rows.join("/"),
            active,
            castling,
            en_passant,
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    /// Parse a move in long algebraic (UCI) notation against the legal moves.
    ///
    /// Castling is written as the king's move (`e1g1`).
    pub fn parse_uci(&self, notation: &str) -> Result<Move, MoveParseError> {
        let len = notation.len();
        if !(4..=5).contains(&len) || !notation.is_ascii() {
            return Err(MoveParseError::InvalidLength { len });
        }
        let invalid_square = || MoveParseError::InvalidSquare {
            notation: notation.to_string(),
        };
        let from: Square = notation[0..2].parse().map_err(|_| invalid_square())?;
        let to: Square = notation[2..4].parse().map_err(|_| invalid_square())?;
        let promotion = match notation[4..].chars().next() {
            None => None,
            Some(c) => match Piece::from_char(c) {
                Some(p @ (Piece::Knight | Piece::Bishop | Piece::Rook | Piece::Queen)) => Some(p),
                _ => return Err(MoveParseError::InvalidPromotion { char: c }),
            },
        };

        self.generate_moves()
            .iter()
            .find(|mv| mv.from() == from && mv.to() == to && mv.promotion_piece() == promotion)
            .copied()
            .ok_or_else(|| MoveParseError::IllegalMove {
                notation: notation.to_string(),
            })
    }

    /// Parse and apply a UCI move, returning the applied move
    pub fn apply_uci(&mut self, notation: &str) -> Result<Move, MoveParseError> {
        let mv = self.parse_uci(notation)?;
        self.apply(mv);
        Ok(mv)
    }
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_fen(s)
    }
}

/// Renders the position as FEN
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fen())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_round_trip() {
        let pos = Position::from_fen(STARTPOS_FEN).expect("valid fen");
        assert_eq!(pos.to_fen(), STARTPOS_FEN);
        assert_eq!(pos.hash(), Position::startpos().hash());
        assert!(pos.is_consistent());
    }

    #[test]
    fn clocks_default_when_missing() {
        let pos = Position::from_fen("8/8/8/8/8/8/8/K6k w - -").expect("valid fen");
        assert_eq!(pos.halfmove_clock(), 0);
        assert_eq!(pos.fullmove_number(), 1);
    }

    #[test]
    fn rejects_malformed_fields() {
        assert!(matches!(
            Position::from_fen("8/8/8/8/8/8/8/K6k"),
            Err(FenError::TooFewParts { found: 1 })
        ));
        assert!(matches!(
            Position::from_fen("8/8/8/8/8/8/8/K6k x - - 0 1"),
            Err(FenError::InvalidSideToMove { .. })
        ));
        assert!(matches!(
            Position::from_fen("8/8/8/8/8/8/8/K6 w - - 0 1"),
            Err(FenError::BadRankWidth { rank: 7, files: 7 })
        ));
        assert!(matches!(
            Position::from_fen("8/8/8/8/8/8/8/K7 w - - 0 1"),
            Err(FenError::KingCount { color: Color::Black, found: 0 })
        ));
        assert!(matches!(
            Position::from_fen("8/8/8/8/8/8/8/K6k w - e4 0 1"),
            Err(FenError::InvalidEnPassant { .. })
        ));
        assert!(matches!(
            Position::from_fen("8/8/8/8/8/8/8/K6k w - - x 1"),
            Err(FenError::InvalidCounter { .. })
        ));
        // Black king attacked by the rook while White is to move
        assert!(matches!(
            Position::from_fen("k6R/8/8/8/8/8/8/K7 w - - 0 1"),
            Err(FenError::OpponentInCheck)
        ));
    }

    #[test]
    fn rejects_en_passant_without_a_pushed_pawn() {
        // No black pawn on e5
        assert!(matches!(
            Position::from_fen("4k3/8/8/3P4/8/8/8/4K3 w - e6 0 1"),
            Err(FenError::InvalidEnPassant { .. })
        ));
        // Target square occupied
        assert!(matches!(
            Position::from_fen("4k3/8/4n3/3Pp3/8/8/8/4K3 w - e6 0 1"),
            Err(FenError::InvalidEnPassant { .. })
        ));
        // Start square occupied, so the pawn cannot have come from there
        assert!(matches!(
            Position::from_fen("4k3/4p3/8/3Pp3/8/8/8/4K3 w - e6 0 1"),
            Err(FenError::InvalidEnPassant { .. })
        ));
        assert!(matches!(
            Position::from_fen("4k3/8/8/8/3Pp3/8/3N4/4K3 b - d3 0 1"),
            Err(FenError::InvalidEnPassant { .. })
        ));

        let pos = Position::from_fen("4k3/8/8/3Pp3/8/8/8/4K3 w - e6 0 1").expect("valid fen");
        assert_eq!(pos.en_passant(), Some("e6".parse().expect("square")));
        let ep_moves = pos.generate_moves().iter().filter(|mv| mv.is_en_passant()).count();
        assert_eq!(ep_moves, 1);
    }

    #[test]
    fn drops_castling_rights_without_rook() {
        let pos = Position::from_fen("r3k3/8/8/8/8/8/8/4K2R w KQkq - 0 1").expect("valid fen");
        assert_eq!(pos.to_fen(), "r3k3/8/8/8/8/8/8/4K2R w Kq - 0 1");
    }

    #[test]
    fn uci_parsing_matches_legal_moves() {
        let pos = Position::startpos();
        let mv = pos.parse_uci("g1f3").expect("legal");
        assert_eq!(mv.piece(), Piece::Knight);
        assert!(matches!(
            pos.parse_uci("e2e5"),
            Err(MoveParseError::IllegalMove { .. })
        ));
        assert!(matches!(
            pos.parse_uci("e2"),
            Err(MoveParseError::InvalidLength { len: 2 })
        ));
        assert!(matches!(
            pos.parse_uci("z2e4"),
            Err(MoveParseError::InvalidSquare { .. })
        ));
        assert!(matches!(
            pos.parse_uci("e7e8x"),
            Err(MoveParseError::InvalidPromotion { char: 'x' })
        ));
    }
}
