use std::fmt::{self, Display};

use crate::{
    attacks::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks},
    piece::{Colour, Piece, PieceType},
    squareset::SquareSet,
    types::Square,
};

/// The square-sets of all the pieces on the board: one set per piece kind
/// plus one per colour. A piece's full identity is the intersection.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct PieceLayout {
    pieces: [SquareSet; 6],
    colours: [SquareSet; 2],
}

impl PieceLayout {
    pub fn occupied(&self) -> SquareSet {
        self.colours[Colour::White] | self.colours[Colour::Black]
    }

    pub fn empty(&self) -> SquareSet {
        !self.occupied()
    }

    pub fn colour(&self, colour: Colour) -> SquareSet {
        self.colours[colour]
    }

    pub fn of_type(&self, piece_type: PieceType) -> SquareSet {
        self.pieces[piece_type]
    }

    pub fn piece_bb(&self, piece: Piece) -> SquareSet {
        self.pieces[piece.piece_type()] & self.colours[piece.colour()]
    }

    /// The square of `colour`'s king. Positions built by this crate always
    /// hold exactly one king per colour.
    pub fn king_sq(&self, colour: Colour) -> Square {
        (self.pieces[PieceType::King] & self.colours[colour])
            .first()
            .expect("no king on the board")
    }

    pub fn set_piece_at(&mut self, sq: Square, piece: Piece) {
        let sq_bb = sq.as_set();
        self.pieces[piece.piece_type()] |= sq_bb;
        self.colours[piece.colour()] |= sq_bb;
    }

    pub fn clear_piece_at(&mut self, sq: Square, piece: Piece) {
        let sq_bb = sq.as_set();
        self.pieces[piece.piece_type()] &= !sq_bb;
        self.colours[piece.colour()] &= !sq_bb;
    }

    pub fn move_piece(&mut self, from: Square, to: Square, piece: Piece) {
        let from_to_bb = from.as_set() | to.as_set();
        self.pieces[piece.piece_type()] ^= from_to_bb;
        self.colours[piece.colour()] ^= from_to_bb;
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        let sq_bb = sq.as_set();
        let colour = if !(self.colours[Colour::White] & sq_bb).is_empty() {
            Colour::White
        } else if !(self.colours[Colour::Black] & sq_bb).is_empty() {
            Colour::Black
        } else {
            return None;
        };
        for piece_type in PieceType::all() {
            if !(self.pieces[piece_type] & sq_bb).is_empty() {
                return Some(Piece::new(colour, piece_type));
            }
        }
        panic!("square {sq} is in a colour set but no piece set");
    }

    /// All pieces of either colour attacking `sq`, given `occupied` as the
    /// blocker set for slider rays.
    ///
    /// Pawn attackers are found by projecting pawn attacks *from* the target
    /// square: a black pawn attacks `sq` exactly when a white pawn on `sq`
    /// would attack the black pawn's square.
    pub fn attackers_to(&self, sq: Square, occupied: SquareSet) -> SquareSet {
        let sq_bb = sq.as_set();
        let pawns = self.pieces[PieceType::Pawn];
        let black_pawn_attackers =
            pawn_attacks(sq_bb, Colour::White) & pawns & self.colours[Colour::Black];
        let white_pawn_attackers =
            pawn_attacks(sq_bb, Colour::Black) & pawns & self.colours[Colour::White];
        let knight_attackers = knight_attacks(sq) & self.pieces[PieceType::Knight];
        let diag_attackers = bishop_attacks(sq, occupied)
            & (self.pieces[PieceType::Bishop] | self.pieces[PieceType::Queen]);
        let orth_attackers = rook_attacks(sq, occupied)
            & (self.pieces[PieceType::Rook] | self.pieces[PieceType::Queen]);
        let king_attackers = king_attacks(sq) & self.pieces[PieceType::King];
        black_pawn_attackers
            | white_pawn_attackers
            | knight_attackers
            | diag_attackers
            | orth_attackers
            | king_attackers
    }

    /// Neither side can possibly deliver mate: bare kings, a lone minor
    /// piece, or nothing but same-coloured bishops besides the kings.
    pub fn insufficient_material(&self) -> bool {
        let occupied = self.occupied();
        let kings = self.pieces[PieceType::King];
        let bishops = self.pieces[PieceType::Bishop];
        let knights = self.pieces[PieceType::Knight];
        match occupied.count() {
            2 => true,
            3 => (bishops | knights).count() == 1,
            _ => {
                occupied == kings | bishops
                    && ((bishops & SquareSet::LIGHT_SQUARES) == bishops
                        || (bishops & SquareSet::DARK_SQUARES) == bishops)
            }
        }
    }

    pub fn visit_pieces(&self, mut callback: impl FnMut(Square, Piece)) {
        for colour in Colour::all() {
            for piece_type in PieceType::all() {
                let piece = Piece::new(colour, piece_type);
                for sq in self.pieces[piece_type] & self.colours[colour] {
                    callback(sq, piece);
                }
            }
        }
    }
}

impl Display for PieceLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u8).rev() {
            for file in 0..8u8 {
                let sq = Square::new(rank * 8 + file).unwrap();
                let c = self.piece_at(sq).map_or('.', Piece::char);
                write!(f, "{c}")?;
            }
            if rank > 0 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout_of(placements: &[(Square, Piece)]) -> PieceLayout {
        let mut layout = PieceLayout::default();
        for &(sq, piece) in placements {
            layout.set_piece_at(sq, piece);
        }
        layout
    }

    #[test]
    fn set_move_clear() {
        let mut layout = PieceLayout::default();
        layout.set_piece_at(Square::E2, Piece::WP);
        assert_eq!(layout.piece_at(Square::E2), Some(Piece::WP));
        layout.move_piece(Square::E2, Square::E4, Piece::WP);
        assert_eq!(layout.piece_at(Square::E2), None);
        assert_eq!(layout.piece_at(Square::E4), Some(Piece::WP));
        layout.clear_piece_at(Square::E4, Piece::WP);
        assert_eq!(layout.occupied(), SquareSet::EMPTY);
    }

    #[test]
    fn attackers_include_every_piece_kind() {
        let layout = layout_of(&[
            (Square::E4, Piece::WP),
            (Square::D3, Piece::WP),
            (Square::F6, Piece::BP),
            (Square::C3, Piece::WN),
            (Square::H1, Piece::WB),
            (Square::E1, Piece::WR),
            (Square::A8, Piece::BQ),
            (Square::D5, Piece::BK),
        ]);
        let attackers = layout.attackers_to(Square::E4, layout.occupied());
        // d3 pawn defends e4, f6 pawn does not attack it; knight c3 jumps to
        // e4; bishop h1 sees it along the open g2-f3 diagonal; rook e1
        // attacks up the file; queen a8 is blocked by the king on d5, which
        // itself touches e4.
        assert!(attackers.contains_square(Square::D3));
        assert!(!attackers.contains_square(Square::F6));
        assert!(attackers.contains_square(Square::C3));
        assert!(attackers.contains_square(Square::H1));
        assert!(attackers.contains_square(Square::E1));
        assert!(!attackers.contains_square(Square::A8));
        assert!(attackers.contains_square(Square::D5));
    }

    #[test]
    fn black_pawns_attack_downwards() {
        let layout = layout_of(&[(Square::D5, Piece::BP)]);
        let attackers = layout.attackers_to(Square::E4, layout.occupied());
        assert!(attackers.contains_square(Square::D5));
        let attackers = layout.attackers_to(Square::E6, layout.occupied());
        assert!(!attackers.contains_square(Square::D5));
    }

    #[test]
    fn slider_attacks_are_blocked() {
        let layout = layout_of(&[
            (Square::A1, Piece::WR),
            (Square::A4, Piece::WP),
            (Square::A8, Piece::BK),
        ]);
        let attackers = layout.attackers_to(Square::A8, layout.occupied());
        assert!(!attackers.contains_square(Square::A1));
        let attackers = layout.attackers_to(Square::A4, layout.occupied());
        assert!(attackers.contains_square(Square::A1));
    }

    #[test]
    fn material_draw_detection() {
        // bare kings
        assert!(layout_of(&[(Square::A1, Piece::WK), (Square::H8, Piece::BK)])
            .insufficient_material());
        // lone knight
        assert!(layout_of(&[
            (Square::A1, Piece::WK),
            (Square::H8, Piece::BK),
            (Square::B3, Piece::BN),
        ])
        .insufficient_material());
        // lone bishop
        assert!(layout_of(&[
            (Square::A1, Piece::WK),
            (Square::H8, Piece::BK),
            (Square::C4, Piece::WB),
        ])
        .insufficient_material());
        // same-coloured bishops either side
        assert!(layout_of(&[
            (Square::A1, Piece::WK),
            (Square::H8, Piece::BK),
            (Square::C1, Piece::WB),
            (Square::F8, Piece::BB),
        ])
        .insufficient_material());
        // opposite-coloured bishops can mate
        assert!(!layout_of(&[
            (Square::A1, Piece::WK),
            (Square::H8, Piece::BK),
            (Square::C1, Piece::WB),
            (Square::C8, Piece::BB),
        ])
        .insufficient_material());
        // a rook is mating material
        assert!(!layout_of(&[
            (Square::A1, Piece::WK),
            (Square::H8, Piece::BK),
            (Square::D4, Piece::WR),
        ])
        .insufficient_material());
        // two knights are not detected as a draw here, matching the
        // convention of the textual-notation ecosystem
        assert!(!layout_of(&[
            (Square::A1, Piece::WK),
            (Square::H8, Piece::BK),
            (Square::B3, Piece::WN),
            (Square::C3, Piece::WN),
        ])
        .insufficient_material());
    }
}
