use thiserror::Error;

use crate::{
    piece::Colour,
    types::{Rank, Square},
};

/// Errors that can occur when parsing a FEN string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenParseError {
    #[error("FEN has {0} fields, expected 6")]
    FieldCount(usize),
    #[error("board part of FEN has {0} rank segments, expected 8")]
    BoardSegments(usize),
    #[error("rank segment does not describe exactly 8 squares")]
    BadSquaresInSegment,
    #[error("adjacent digits in a rank segment are not allowed")]
    AdjacentDigits,
    #[error("unexpected character in piece placement: {0:?}")]
    UnexpectedCharacter(char),
    #[error("expected side to be 'w' or 'b', got {0:?}")]
    BadSide(String),
    #[error("invalid castling field: {0:?}")]
    BadCastling(String),
    #[error("invalid en passant square: {0:?}")]
    BadEnPassant(String),
    #[error("en passant rank for {square:?} should be {expected:?} with {side} to move")]
    IllegalEnPassant {
        square: Square,
        expected: Rank,
        side: Colour,
    },
    #[error("invalid half-move or full-move counter: {0:?}")]
    BadCounter(String),
    #[error("more than one {0} king")]
    TooManyKings(Colour),
    #[error("{0} king is missing")]
    MissingKing(Colour),
}

/// Errors that can occur when decoding a SAN move against a position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SanError {
    #[error("no legal move matches {0:?}")]
    Unknown(String),
    #[error("more than one legal move matches {0:?}")]
    Ambiguous(String),
}

/// Errors that can occur when reading a PGN document or replaying a game.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PgnError {
    #[error("malformed header line: {0:?}")]
    MalformedHeader(String),
    #[error("comment opened with '{{' but never closed")]
    UnterminatedComment,
    #[error("illegal move {san:?} at move {move_number}")]
    IllegalMove { san: String, move_number: u32 },
    #[error("bad FEN header: {0}")]
    InvalidFen(#[from] FenParseError),
}
