//! Error types for position and move parsing.

use thiserror::Error;

/// Error type for FEN parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("FEN must have at least 4 fields, found {found}")]
    TooFewParts { found: usize },
    #[error("FEN has {found} fields, at most 6 are allowed")]
    TooManyParts { found: usize },
    #[error("invalid piece character '{char}' in FEN")]
    InvalidPiece { char: char },
    #[error("FEN placement must describe 8 ranks, found {found}")]
    WrongRankCount { found: usize },
    #[error("rank {rank} of the FEN placement covers {files} files instead of 8")]
    BadRankWidth { rank: usize, files: usize },
    #[error("invalid side to move '{found}', expected 'w' or 'b'")]
    InvalidSideToMove { found: String },
    #[error("invalid castling character '{char}' in FEN")]
    InvalidCastling { char: char },
    #[error("invalid en passant square '{found}'")]
    InvalidEnPassant { found: String },
    #[error("invalid move counter '{found}'")]
    InvalidCounter { found: String },
    #[error("{color} must have exactly one king, found {found}")]
    KingCount { color: crate::board::Color, found: u32 },
    #[error("pawn on the first or last rank")]
    PawnOnBackRank,
    #[error("the side not to move is in check")]
    OpponentInCheck,
}

/// Error type for long algebraic (UCI) move parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveParseError {
    #[error("move must be 4-5 characters, found {len}")]
    InvalidLength { len: usize },
    #[error("invalid square notation in '{notation}'")]
    InvalidSquare { notation: String },
    #[error("invalid promotion piece '{char}'")]
    InvalidPromotion { char: char },
    #[error("illegal move '{notation}'")]
    IllegalMove { notation: String },
}

/// Error type for square parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SquareError {
    #[error("rank {rank} out of bounds (must be 0-7)")]
    RankOutOfBounds { rank: u8 },
    #[error("file {file} out of bounds (must be 0-7)")]
    FileOutOfBounds { file: u8 },
    #[error("invalid square notation '{notation}'")]
    InvalidNotation { notation: String },
}

/// Error type for SAN (Standard Algebraic Notation) parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SanError {
    #[error("empty SAN string")]
    Empty,
    #[error("malformed SAN '{san}'")]
    Malformed { san: String },
    #[error("no legal move matches '{san}'")]
    NoMatchingMove { san: String },
    #[error("'{san}' is ambiguous, {count} legal moves match")]
    AmbiguousMove { san: String, count: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_input() {
        let err = FenError::InvalidSideToMove {
            found: "x".to_string(),
        };
        assert_eq!(err.to_string(), "invalid side to move 'x', expected 'w' or 'b'");

        let err = SanError::AmbiguousMove {
            san: "Nd2".to_string(),
            count: 2,
        };
        assert!(err.to_string().contains("Nd2"));
        assert!(err.to_string().contains('2'));
    }
}
