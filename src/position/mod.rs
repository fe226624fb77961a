//! The immutable position value and its transitions.

pub mod movegen;
pub mod san;

use std::{
    fmt::{self, Debug, Display, Formatter},
    num::NonZeroU32,
};

use crate::{
    chessmove::Move,
    errors::FenParseError,
    fen::Fen,
    piece::{Colour, Piece, PieceType},
    piecelayout::PieceLayout,
    types::{CastlingRights, Rank, Square},
};

/// The outcome of a move with respect to the opposing king.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    None,
    Check,
    Checkmate,
}

/// A chess position: board, side to move, castling rights, en passant
/// target, and the two move counters.
///
/// Positions are immutable values. [`Position::apply`] returns a fresh
/// position and leaves the original untouched, so histories are just
/// collections of positions and equality is plain structural equality.
#[derive(Clone, PartialEq, Eq)]
pub struct Position {
    pub(crate) bbs: PieceLayout,
    pub(crate) mailbox: [Option<Piece>; 64],
    side: Colour,
    castling: CastlingRights,
    ep_square: Option<Square>,
    halfmove: u16,
    fullmove: NonZeroU32,
}

impl Position {
    pub const STARTING_FEN: &'static str =
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// The standard starting position.
    pub fn startpos() -> Self {
        Self::from_fen(Self::STARTING_FEN).expect("STARTING_FEN is broken")
    }

    pub fn from_fen(fen: &str) -> Result<Self, FenParseError> {
        Ok(Self::from_parsed_fen(&Fen::parse(fen)?))
    }

    pub fn from_parsed_fen(fen: &Fen) -> Self {
        let mut mailbox = [None; 64];
        fen.board.visit_pieces(|sq, piece| mailbox[sq] = Some(piece));
        Self {
            bbs: fen.board,
            mailbox,
            side: fen.turn,
            castling: fen.castling,
            ep_square: fen.ep,
            halfmove: fen.halfmove,
            fullmove: fen.fullmove,
        }
    }

    pub fn fen(&self) -> String {
        Fen {
            board: self.bbs,
            turn: self.side,
            castling: self.castling,
            ep: self.ep_square,
            halfmove: self.halfmove,
            fullmove: self.fullmove,
        }
        .to_string()
    }

    pub const fn turn(&self) -> Colour {
        self.side
    }

    pub const fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    pub const fn ep_square(&self) -> Option<Square> {
        self.ep_square
    }

    pub const fn halfmove_clock(&self) -> u16 {
        self.halfmove
    }

    pub const fn fullmove_number(&self) -> NonZeroU32 {
        self.fullmove
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.mailbox[sq]
    }

    pub fn king_sq(&self, side: Colour) -> Square {
        self.bbs.king_sq(side)
    }

    /// Is `sq` attacked by any piece of `by`?
    pub fn attacked_by(&self, sq: Square, by: Colour) -> bool {
        !(self.bbs.attackers_to(sq, self.bbs.occupied()) & self.bbs.colour(by)).is_empty()
    }

    /// Is the side to move in check?
    pub fn in_check(&self) -> bool {
        self.attacked_by(self.king_sq(self.side), !self.side)
    }

    pub fn in_checkmate(&self) -> bool {
        self.in_check() && self.legal_moves().is_empty()
    }

    pub fn in_stalemate(&self) -> bool {
        !self.in_check() && self.legal_moves().is_empty()
    }

    pub fn is_insufficient_material(&self) -> bool {
        self.bbs.insufficient_material()
    }

    /// Fifty full moves (one hundred plies) without a capture or pawn move.
    pub fn is_fifty_moves(&self) -> bool {
        self.halfmove >= 100
    }

    /// Checkmate, stalemate, or a claimable draw.
    pub fn is_game_over(&self) -> bool {
        self.legal_moves().is_empty() || self.is_insufficient_material() || self.is_fifty_moves()
    }

    /// Repetition equality: board, side to move, castling rights, and en
    /// passant target. The move counters are deliberately ignored.
    pub fn same_for_repetition(&self, other: &Self) -> bool {
        self.bbs == other.bbs
            && self.side == other.side
            && self.castling == other.castling
            && self.ep_square == other.ep_square
    }

    /// Apply a move produced by the generator for this position, yielding
    /// the successor position.
    ///
    /// Passing a move that was not generated for this exact position is a
    /// precondition violation: the result is meaningless, and an empty
    /// from-square panics.
    pub fn apply(&self, m: Move) -> Self {
        let mut next = self.clone();
        next.play(m);
        next
    }

    /// Pass the move: flip the side to move and forfeit the en passant
    /// opportunity. Used to replay null-move tokens from imported games.
    pub fn apply_null(&self) -> Self {
        let mut next = self.clone();
        next.ep_square = None;
        next.halfmove += 1;
        if next.side == Colour::Black {
            next.fullmove = next.fullmove.checked_add(1).expect("game too long");
        }
        next.side = !next.side;
        next
    }

    /// Does this move give check, and if so, is it mate?
    pub fn gives(&self, m: Move) -> CheckState {
        let next = self.apply(m);
        if !next.in_check() {
            CheckState::None
        } else if next.legal_moves().is_empty() {
            CheckState::Checkmate
        } else {
            CheckState::Check
        }
    }

    fn play(&mut self, m: Move) {
        let from = m.from();
        let to = m.to();
        let side = self.side;
        let piece = self.mailbox[from].expect("no piece on from-square");
        debug_assert_eq!(piece.colour(), side, "moving an enemy piece");
        let captured = self.mailbox[to];
        debug_assert!(
            captured.map_or(true, |c| c.colour() != side),
            "capturing our own piece"
        );

        if m.is_ep() {
            // the victim pawn sits behind the target square
            let victim_sq = to.pawn_push(!side).expect("en passant off the board");
            let victim = Piece::new(!side, PieceType::Pawn);
            self.bbs.clear_piece_at(victim_sq, victim);
            self.mailbox[victim_sq] = None;
        } else if let Some(captured) = captured {
            self.bbs.clear_piece_at(to, captured);
        }

        if let Some(promo) = m.promotion_type() {
            let promoted = Piece::new(side, promo);
            self.bbs.clear_piece_at(from, piece);
            self.bbs.set_piece_at(to, promoted);
            self.mailbox[from] = None;
            self.mailbox[to] = Some(promoted);
        } else {
            self.bbs.move_piece(from, to, piece);
            self.mailbox[from] = None;
            self.mailbox[to] = Some(piece);
        }

        if m.is_castle() {
            // the rook jumps the king: corner to the square the king crossed
            let rank = from.rank();
            let (rook_from, rook_to) = if m.is_kingside_castle() {
                (Square::H1, Square::F1)
            } else {
                (Square::A1, Square::D1)
            };
            let (rook_from, rook_to) = if rank == Rank::One {
                (rook_from, rook_to)
            } else {
                (rook_from.flip_rank(), rook_to.flip_rank())
            };
            let rook = Piece::new(side, PieceType::Rook);
            self.bbs.move_piece(rook_from, rook_to, rook);
            self.mailbox[rook_from] = None;
            self.mailbox[rook_to] = Some(rook);
        }

        // castling rights fall in a fixed order: the king abandons both of
        // its own, a rook leaving its corner drops one, and capturing a rook
        // on its corner drops one of the opponent's
        if piece.piece_type() == PieceType::King {
            self.castling = self.castling.without_colour(side);
        }
        if piece.piece_type() == PieceType::Rook {
            self.castling = self.castling.without_corner(from);
        }
        if captured.is_some_and(|c| c.piece_type() == PieceType::Rook) {
            self.castling = self.castling.without_corner(to);
        }

        // a double pawn push exposes the square it skipped
        self.ep_square = if piece.piece_type() == PieceType::Pawn
            && from.rank().abs_diff(to.rank()) == 2
        {
            from.pawn_push(side)
        } else {
            None
        };

        if piece.piece_type() == PieceType::Pawn || captured.is_some() || m.is_ep() {
            self.halfmove = 0;
        } else {
            self.halfmove += 1;
        }

        if side == Colour::Black {
            self.fullmove = self.fullmove.checked_add(1).expect("game too long");
        }
        self.side = !side;
    }
}

/// True if any position occurs three or more times in `history` under
/// repetition equality (first four FEN fields; clocks ignored).
pub fn is_threefold_repetition(history: &[Position]) -> bool {
    for (i, position) in history.iter().enumerate() {
        let repeats = history[i..]
            .iter()
            .filter(|other| position.same_for_repetition(other))
            .count();
        if repeats >= 3 {
            return true;
        }
    }
    false
}

impl Debug for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Position({})", self.fen())
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fen())
    }
}
