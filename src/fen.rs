//! Forsyth-Edwards Notation.

use std::{
    fmt::{self, Display},
    num::NonZeroU32,
    str::FromStr,
};

use crate::{
    errors::FenParseError,
    piece::{Colour, Piece, PieceType},
    piecelayout::PieceLayout,
    types::{CastlingRights, File, Rank, Square},
};

/// A parsed FEN record: the six fields, validated but not yet a [`Position`].
///
/// [`Position`]: crate::position::Position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fen {
    pub board: PieceLayout,
    pub turn: Colour,
    pub castling: CastlingRights,
    pub ep: Option<Square>,
    pub halfmove: u16,
    pub fullmove: NonZeroU32,
}

impl Fen {
    /// Parse a FEN string. All six fields must be present, space-separated.
    pub fn parse(fen: &str) -> Result<Self, FenParseError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(FenParseError::FieldCount(fields.len()));
        }

        let board = Self::parse_board(fields[0])?;
        let turn = Self::parse_turn(fields[1])?;
        let castling = Self::parse_castling(fields[2])?;
        let ep = Self::parse_ep(fields[3], turn)?;
        let halfmove = fields[4]
            .parse::<u16>()
            .map_err(|_| FenParseError::BadCounter(fields[4].to_string()))?;
        let fullmove = fields[5]
            .parse::<u32>()
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or_else(|| FenParseError::BadCounter(fields[5].to_string()))?;

        Ok(Self {
            board,
            turn,
            castling,
            ep,
            halfmove,
            fullmove,
        })
    }

    fn parse_board(board_str: &str) -> Result<PieceLayout, FenParseError> {
        let mut layout = PieceLayout::default();

        let segments: Vec<&str> = board_str.split('/').collect();
        if segments.len() != 8 {
            return Err(FenParseError::BoardSegments(segments.len()));
        }

        // FEN lists ranks from the top of the board down.
        for (i, segment) in segments.iter().enumerate() {
            let rank = Rank::from_index(7 - i as u8).unwrap();
            let mut file = 0u8;
            let mut prev_was_digit = false;

            for c in segment.chars() {
                match c {
                    '1'..='8' => {
                        if prev_was_digit {
                            return Err(FenParseError::AdjacentDigits);
                        }
                        prev_was_digit = true;
                        file += c as u8 - b'0';
                        if file > 8 {
                            return Err(FenParseError::BadSquaresInSegment);
                        }
                    }
                    _ => {
                        let piece = Piece::from_char(c)
                            .ok_or(FenParseError::UnexpectedCharacter(c))?;
                        prev_was_digit = false;
                        let Some(f) = File::from_index(file) else {
                            return Err(FenParseError::BadSquaresInSegment);
                        };
                        layout.set_piece_at(Square::from_rank_file(rank, f), piece);
                        file += 1;
                    }
                }
            }

            if file != 8 {
                return Err(FenParseError::BadSquaresInSegment);
            }
        }

        for colour in Colour::all() {
            let kings = layout.of_type(PieceType::King) & layout.colour(colour);
            match kings.count() {
                0 => return Err(FenParseError::MissingKing(colour)),
                1 => (),
                _ => return Err(FenParseError::TooManyKings(colour)),
            }
        }

        Ok(layout)
    }

    fn parse_turn(s: &str) -> Result<Colour, FenParseError> {
        match s {
            "w" => Ok(Colour::White),
            "b" => Ok(Colour::Black),
            _ => Err(FenParseError::BadSide(s.to_string())),
        }
    }

    fn parse_castling(s: &str) -> Result<CastlingRights, FenParseError> {
        if s == "-" {
            return Ok(CastlingRights::NONE);
        }
        if s.is_empty() {
            return Err(FenParseError::BadCastling(s.to_string()));
        }

        // any subset of "KQkq", preserving that order
        let mut rights = CastlingRights::NONE;
        let mut expected = ['K', 'Q', 'k', 'q'].into_iter();
        for c in s.chars() {
            // each letter must appear after the previously consumed one
            if !expected.any(|e| e == c) {
                return Err(FenParseError::BadCastling(s.to_string()));
            }
            match c {
                'K' => rights.grant_kingside(Colour::White),
                'Q' => rights.grant_queenside(Colour::White),
                'k' => rights.grant_kingside(Colour::Black),
                'q' => rights.grant_queenside(Colour::Black),
                _ => unreachable!(),
            }
        }
        Ok(rights)
    }

    fn parse_ep(s: &str, turn: Colour) -> Result<Option<Square>, FenParseError> {
        if s == "-" {
            return Ok(None);
        }

        let square: Square = s
            .parse()
            .map_err(|_| FenParseError::BadEnPassant(s.to_string()))?;
        if !matches!(square.rank(), Rank::Three | Rank::Six) {
            return Err(FenParseError::BadEnPassant(s.to_string()));
        }

        // the capture square sits behind the pawn that just made a double
        // push, so it is on rank 6 when white is to move and rank 3 when
        // black is
        let expected = match turn {
            Colour::White => Rank::Six,
            Colour::Black => Rank::Three,
        };
        if square.rank() != expected {
            return Err(FenParseError::IllegalEnPassant {
                square,
                expected,
                side: turn,
            });
        }

        Ok(Some(square))
    }
}

impl Display for Fen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::all().rev() {
            let mut empty_run = 0;
            for file in File::all() {
                match self.board.piece_at(Square::from_rank_file(rank, file)) {
                    Some(piece) => {
                        if empty_run > 0 {
                            write!(f, "{empty_run}")?;
                            empty_run = 0;
                        }
                        write!(f, "{piece}")?;
                    }
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                write!(f, "{empty_run}")?;
            }
            if rank != Rank::One {
                write!(f, "/")?;
            }
        }

        let side = match self.turn {
            Colour::White => 'w',
            Colour::Black => 'b',
        };
        write!(f, " {side} {}", self.castling)?;
        match self.ep {
            Some(sq) => write!(f, " {sq}")?,
            None => write!(f, " -")?,
        }
        write!(f, " {} {}", self.halfmove, self.fullmove)
    }
}

impl FromStr for Fen {
    type Err = FenParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
