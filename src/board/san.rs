//! Standard Algebraic Notation (SAN) support.
//!
//! SAN is the human-readable notation used in scoresheets, books and GUIs:
//! "e4", "Nf3", "Bxc6+", "O-O", "e8=Q#". Parsing is lenient about check and
//! annotation suffixes and matches against the legal move list.
//!
//! # Examples
//! ```
//! use chess_core::board::Position;
//!
//! let pos = Position::startpos();
//! let mv = pos.parse_san("Nf3").unwrap();
//! assert_eq!(pos.move_to_san(mv), "Nf3");
//! ```

use super::error::SanError;
use super::{CastleSide, Move, Piece, Position, Square};

/// Components of a non-castling SAN move
struct SanParts {
    piece: Piece,
    from_file: Option<u8>,
    from_rank: Option<u8>,
    to: Square,
    promotion: Option<Piece>,
}

impl Position {
    /// Format a legal move in Standard Algebraic Notation, with `+` or `#`
    #[must_use]
    pub fn move_to_san(&self, mv: Move) -> String {
        let mut san = String::new();

        if let Some(side) = mv.castle_side() {
            san.push_str(match side {
                CastleSide::King => "O-O",
                CastleSide::Queen => "O-O-O",
            });
        } else {
            let piece = self.piece_on(mv.from()).unwrap_or(Piece::Pawn);
            let is_capture = mv.is_en_passant() || self.piece_on(mv.to()).is_some();

            if piece == Piece::Pawn {
                if is_capture {
                    san.push(file_char(mv.from()));
                }
            } else {
                san.push(piece.to_char().to_ascii_uppercase());
                let (needs_file, needs_rank) = self.disambiguation(mv, piece);
                if needs_file {
                    san.push(file_char(mv.from()));
                }
                if needs_rank {
                    san.push(rank_char(mv.from()));
                }
            }

            if is_capture {
                san.push('x');
            }
            san.push_str(&mv.to().to_string());

            if let Some(promo) = mv.promotion_piece() {
                san.push('=');
                san.push(promo.to_char().to_ascii_uppercase());
            }
        }

        let mut after = self.clone();
        after.apply(mv);
        if after.in_check() {
            san.push(if after.generate_moves().is_empty() { '#' } else { '+' });
        }
        san
    }

    /// Which parts of the origin square SAN must spell out.
    /// Returns (`needs_file`, `needs_rank`).
    fn disambiguation(&self, mv: Move, piece: Piece) -> (bool, bool) {
        let moves = self.generate_moves();
        let rivals: Vec<Square> = moves
            .iter()
            .filter(|m| {
                m.to() == mv.to()
                    && m.from() != mv.from()
                    && self.piece_on(m.from()) == Some(piece)
            })
            .map(|m| m.from())
            .collect();

        if rivals.is_empty() {
            return (false, false);
        }
        let same_file = rivals.iter().any(|sq| sq.file() == mv.from().file());
        let same_rank = rivals.iter().any(|sq| sq.rank() == mv.from().rank());
        match (same_file, same_rank) {
            (false, _) => (true, false),
            (true, false) => (false, true),
            (true, true) => (true, true),
        }
    }

    /// Parse a move in Standard Algebraic Notation.
    ///
    /// Accepts "e4", "Nf3", "Bxc6", "R1d2", "O-O", "e8=Q" (or "e8Q"), with
    /// optional `+`, `#`, `!` and `?` suffixes. Castling may use zeros.
    pub fn parse_san(&self, san: &str) -> Result<Move, SanError> {
        let trimmed = san.trim();
        if trimmed.is_empty() {
            return Err(SanError::Empty);
        }
        let core = trimmed.trim_end_matches(['+', '#', '!', '?']);
        let moves = self.generate_moves();

        let castle = match core {
            "O-O" | "0-0" => Some(CastleSide::King),
            "O-O-O" | "0-0-0" => Some(CastleSide::Queen),
            _ => None,
        };
        if let Some(side) = castle {
            return moves
                .iter()
                .find(|mv| mv.castle_side() == Some(side))
                .copied()
                .ok_or_else(|| SanError::NoMatchingMove {
                    san: trimmed.to_string(),
                });
        }

        let parts = parse_parts(core).ok_or_else(|| SanError::Malformed {
            san: trimmed.to_string(),
        })?;

        let matching: Vec<Move> = moves
            .iter()
            .filter(|mv| {
                !mv.is_castling()
                    && mv.to() == parts.to
                    && mv.promotion_piece() == parts.promotion
                    && self.piece_on(mv.from()) == Some(parts.piece)
                    && parts.from_file.map_or(true, |f| mv.from().file() == f)
                    && parts.from_rank.map_or(true, |r| mv.from().rank() == r)
            })
            .copied()
            .collect();

        match matching.as_slice() {
            [] => Err(SanError::NoMatchingMove {
                san: trimmed.to_string(),
            }),
            [mv] => Ok(*mv),
            _ => Err(SanError::AmbiguousMove {
                san: trimmed.to_string(),
                count: matching.len(),
            }),
        }
    }

    /// Parse and apply a SAN move, returning the applied move
    pub fn apply_san(&mut self, san: &str) -> Result<Move, SanError> {
        let mv = self.parse_san(san)?;
        self.apply(mv);
        Ok(mv)
    }
}

/// Split `[Piece][file][rank][x]<square>[=Promo]` into its components
fn parse_parts(core: &str) -> Option<SanParts> {
    let mut chars: Vec<char> = core.chars().collect();

    let suffix = match chars.as_slice() {
        [.., '=', p] => Some((*p, 2)),
        [.., '1'..='8', p @ ('N' | 'B' | 'R' | 'Q')] => Some((*p, 1)),
        _ => None,
    };
    let promotion = match suffix {
        Some((c, strip)) => {
            let promo = Piece::from_char(c).filter(|p| !matches!(p, Piece::Pawn | Piece::King))?;
            chars.truncate(chars.len() - strip);
            Some(promo)
        }
        None => None,
    };

    if chars.len() < 2 {
        return None;
    }
    let dest: String = chars[chars.len() - 2..].iter().collect();
    let to: Square = dest.parse().ok()?;
    chars.truncate(chars.len() - 2);

    let mut rest = chars.as_slice();
    let piece = match rest.first() {
        Some(c) if c.is_ascii_uppercase() => {
            let piece = Piece::from_char(*c).filter(|p| *p != Piece::Pawn)?;
            rest = &rest[1..];
            piece
        }
        _ => Piece::Pawn,
    };
    if piece != Piece::Pawn && promotion.is_some() {
        return None;
    }

    let mut from_file = None;
    let mut from_rank = None;
    for (i, c) in rest.iter().enumerate() {
        match c {
            'a'..='h' if from_file.is_none() && from_rank.is_none() => {
                from_file = Some(*c as u8 - b'a');
            }
            '1'..='8' if from_rank.is_none() => from_rank = Some(*c as u8 - b'1'),
            'x' if i == rest.len() - 1 => {}
            _ => return None,
        }
    }

    Some(SanParts {
        piece,
        from_file,
        from_rank,
        to,
        promotion,
    })
}

fn file_char(sq: Square) -> char {
    (b'a' + sq.file()) as char
}

fn rank_char(sq: Square) -> char {
    (b'1' + sq.rank()) as char
}
