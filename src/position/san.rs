//! Standard Algebraic Notation, in both directions.

use std::{
    fmt::{self, Display, Formatter},
    sync::LazyLock,
};

use regex::Regex;

use crate::{
    attacks::attacks_by_type,
    chessmove::Move,
    errors::SanError,
    piece::{Piece, PieceType},
    position::{CheckState, Position},
    squareset::SquareSet,
    types::Square,
};

/// A move rendered lazily as SAN; produced by [`Position::san`] and
/// [`Position::san_sloppy`], realised by `Display`.
#[derive(Clone, Copy)]
pub struct San<'a> {
    position: &'a Position,
    m: Move,
    sloppy: bool,
}

impl Display for San<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let body = self.position.san_body(self.m, self.sloppy);
        let suffix = match self.position.gives(self.m) {
            CheckState::None => "",
            CheckState::Check => "+",
            CheckState::Checkmate => "#",
        };
        write!(f, "{body}{suffix}")
    }
}

impl Position {
    /// Render a legal move as SAN, with minimal disambiguation. Returns
    /// `None` if the move is not legal here.
    pub fn san(&self, m: Move) -> Option<San<'_>> {
        self.san_inner(m, false)
    }

    /// Like [`Position::san`], but disambiguates against *pseudo-legal*
    /// same-kind movers, matching tools that over-disambiguate pinned
    /// pieces (`Nge7` where `Ne7` would do).
    pub fn san_sloppy(&self, m: Move) -> Option<San<'_>> {
        self.san_inner(m, true)
    }

    fn san_inner(&self, m: Move, sloppy: bool) -> Option<San<'_>> {
        if !self.pseudo_legal_moves_from(m.from()).contains(m) || !self.is_legal(m) {
            return None;
        }
        Some(San {
            position: self,
            m,
            sloppy,
        })
    }

    /// The SAN text without the check suffix.
    fn san_body(&self, m: Move, sloppy: bool) -> String {
        if m.is_castle() {
            return if m.is_kingside_castle() {
                "O-O".to_string()
            } else {
                "O-O-O".to_string()
            };
        }

        let from = m.from();
        let to = m.to();
        let piece = self.mailbox[from].expect("no piece on from-square");
        let kind = piece.piece_type();
        let is_capture = self.mailbox[to].is_some() || m.is_ep();

        let mut out = String::new();
        if let Some(letter) = kind.san_char() {
            out.push(letter);
            let ambiguous = self.disambiguators(piece, from, to, sloppy);
            if !ambiguous.is_empty() {
                let share_file = !(ambiguous & SquareSet::FILES[from.file()]).is_empty();
                let share_rank = !(ambiguous & SquareSet::RANKS[from.rank()]).is_empty();
                if !share_file {
                    out.push(from.file().char());
                } else if !share_rank {
                    out.push(from.rank().char());
                } else {
                    out.push(from.file().char());
                    out.push(from.rank().char());
                }
            }
        } else if is_capture {
            out.push(from.file().char());
        }
        if is_capture {
            out.push('x');
        }
        out.push_str(to.name());
        if let Some(promo) = m.promotion_type() {
            out.push('=');
            out.push(promo.promo_char().unwrap().to_ascii_uppercase());
        }
        out
    }

    /// The same-kind pieces the mover must be distinguished from: those
    /// with a legal move to the destination (strict), or those merely
    /// attacking it (sloppy).
    fn disambiguators(&self, piece: Piece, from: Square, to: Square, sloppy: bool) -> SquareSet {
        let siblings = self.bbs.piece_bb(piece).remove_square(from);
        if sloppy {
            return attacks_by_type(piece.piece_type(), to, self.bbs.occupied()) & siblings;
        }
        let mut ambiguous = SquareSet::EMPTY;
        for candidate in siblings {
            if self
                .legal_moves_from(candidate)
                .iter()
                .any(|mv| mv.to() == to && !mv.is_castle())
            {
                ambiguous = ambiguous.add_square(candidate);
            }
        }
        ambiguous
    }

    /// Decode a SAN string against this position.
    ///
    /// In strict mode the text must be the canonical SAN of some legal move
    /// (check suffixes, annotation glyphs, and `=` are ignored). With
    /// `sloppy` set, over-disambiguated SAN and long algebraic notation are
    /// also accepted.
    pub fn parse_san(&self, text: &str, sloppy: bool) -> Result<Move, SanError> {
        let trimmed = text.trim();
        let stripped = trimmed.trim_end_matches(['+', '#', '!', '?']);

        let legal = self.legal_moves();

        if stripped == "O-O" || (sloppy && stripped == "0-0") {
            return legal
                .iter()
                .copied()
                .find(|m| m.is_kingside_castle())
                .ok_or_else(|| SanError::Unknown(trimmed.to_string()));
        }
        if stripped == "O-O-O" || (sloppy && stripped == "0-0-0") {
            return legal
                .iter()
                .copied()
                .find(|m| m.is_queenside_castle())
                .ok_or_else(|| SanError::Unknown(trimmed.to_string()));
        }

        let cleaned: String = stripped.chars().filter(|&c| c != '=').collect();
        if cleaned.is_empty() {
            return Err(SanError::Unknown(trimmed.to_string()));
        }

        if let Some(found) = self.match_by_encoding(&legal, &cleaned, false)? {
            return Ok(found);
        }
        if sloppy {
            if let Some(found) = self.match_by_encoding(&legal, &cleaned, true)? {
                return Ok(found);
            }
            if let Some(found) = self.match_long_algebraic(&legal, &cleaned, trimmed)? {
                return Ok(found);
            }
        }

        Err(SanError::Unknown(trimmed.to_string()))
    }

    fn match_by_encoding(
        &self,
        legal: &[Move],
        cleaned: &str,
        sloppy: bool,
    ) -> Result<Option<Move>, SanError> {
        let mut found = None;
        for &m in legal {
            let body: String = self
                .san_body(m, sloppy)
                .chars()
                .filter(|&c| c != '=')
                .collect();
            if body == cleaned {
                if found.is_some() {
                    return Err(SanError::Ambiguous(cleaned.to_string()));
                }
                found = Some(m);
            }
        }
        Ok(found)
    }

    fn match_long_algebraic(
        &self,
        legal: &[Move],
        cleaned: &str,
        original: &str,
    ) -> Result<Option<Move>, SanError> {
        static LAN_RE: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"(?i)^([pnbrqk])?([a-h][1-8])[x-]?([a-h][1-8])([qrbn])?$").unwrap()
        });

        let Some(caps) = LAN_RE.captures(cleaned) else {
            return Ok(None);
        };
        let parse_square = |s: &str| s.to_ascii_lowercase().parse::<Square>().ok();
        let Some(from) = caps.get(2).and_then(|g| parse_square(g.as_str())) else {
            return Ok(None);
        };
        let Some(to) = caps.get(3).and_then(|g| parse_square(g.as_str())) else {
            return Ok(None);
        };
        let piece_letter = caps
            .get(1)
            .and_then(|g| g.as_str().chars().next())
            .map(|c| c.to_ascii_uppercase());
        let promotion = caps
            .get(4)
            .and_then(|g| g.as_str().chars().next())
            .and_then(PieceType::from_promo_char);

        let mut found = None;
        for &m in legal {
            if m.from() != from || m.to() != to || m.promotion_type() != promotion {
                continue;
            }
            if let Some(letter) = piece_letter {
                let moved = self.mailbox[from].expect("legal move from an empty square");
                let expected = match letter {
                    'P' => PieceType::Pawn,
                    'N' => PieceType::Knight,
                    'B' => PieceType::Bishop,
                    'R' => PieceType::Rook,
                    'Q' => PieceType::Queen,
                    'K' => PieceType::King,
                    _ => return Ok(None),
                };
                if moved.piece_type() != expected {
                    continue;
                }
            }
            if found.is_some() {
                return Err(SanError::Ambiguous(original.to_string()));
            }
            found = Some(m);
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chessmove::MoveFlags;

    fn pos(fen: &str) -> Position {
        Position::from_fen(fen).unwrap()
    }

    fn san_of(p: &Position, text: &str) -> String {
        let m = p.parse_san(text, false).unwrap();
        p.san(m).unwrap().to_string()
    }

    #[test]
    fn plain_moves() {
        let p = Position::startpos();
        let m = p.parse_san("e4", false).unwrap();
        assert_eq!(m.from(), Square::E2);
        assert_eq!(m.to(), Square::E4);
        assert_eq!(p.san(m).unwrap().to_string(), "e4");

        let m = p.parse_san("Nf3", false).unwrap();
        assert_eq!(m.from(), Square::G1);
        assert_eq!(p.san(m).unwrap().to_string(), "Nf3");
    }

    #[test]
    fn captures_and_pawn_file_prefix() {
        let p = pos("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2");
        assert_eq!(san_of(&p, "exd5"), "exd5");
        let m = p.parse_san("exd5", false).unwrap();
        assert_eq!(m.from(), Square::E4);
        assert_eq!(m.to(), Square::D5);
    }

    #[test]
    fn en_passant_is_written_as_a_capture() {
        let p = pos("rnbqkbnr/pppp1ppp/8/4pP2/8/8/PPPPP1PP/RNBQKBNR w KQkq e6 0 3");
        let m = p.parse_san("fxe6", false).unwrap();
        assert!(m.is_ep());
        assert_eq!(p.san(m).unwrap().to_string(), "fxe6");
    }

    #[test]
    fn castling_notation() {
        let p = pos("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1");
        let short = p.parse_san("O-O", false).unwrap();
        assert!(short.is_kingside_castle());
        assert_eq!(p.san(short).unwrap().to_string(), "O-O");
        let long = p.parse_san("O-O-O", false).unwrap();
        assert!(long.is_queenside_castle());
        assert_eq!(p.san(long).unwrap().to_string(), "O-O-O");
        // the zero spelling is only accepted sloppily
        assert!(p.parse_san("0-0", false).is_err());
        assert_eq!(p.parse_san("0-0", true).unwrap(), short);
    }

    #[test]
    fn file_disambiguation() {
        // knights on b5 and f3 can both reach d4
        let p = pos("r1bqkbnr/pppp1ppp/2n5/1N2p3/4P3/5N2/PPPP1PPP/R1BQKB1R w KQ - 4 5");
        let m = p.parse_san("Nbd4", false).unwrap();
        assert_eq!(m.from(), Square::B5);
        assert_eq!(p.san(m).unwrap().to_string(), "Nbd4");
        let m = p.parse_san("Nfd4", false).unwrap();
        assert_eq!(m.from(), Square::F3);
        // the bare form matches no move's canonical encoding: both knights
        // render with a disambiguator, so strict decoding rejects it
        assert_eq!(
            p.parse_san("Nd4", false),
            Err(SanError::Unknown("Nd4".to_string()))
        );
    }

    #[test]
    fn rank_disambiguation() {
        // rooks on a1 and a5 share a file, so the rank must speak
        let p = pos("4k3/8/8/R7/8/8/8/R3K3 w Q - 0 1");
        let m = p.parse_san("R1a3", false).unwrap();
        assert_eq!(m.from(), Square::A1);
        assert_eq!(p.san(m).unwrap().to_string(), "R1a3");
        let m = p.parse_san("R5a3", false).unwrap();
        assert_eq!(m.from(), Square::A5);
    }

    #[test]
    fn full_square_disambiguation_with_promoted_queens() {
        // queens on d1, d5, and f5 all see d3: file and rank both collide
        let p = pos("4k3/8/8/3Q1Q2/8/8/8/3Q1K2 w - - 0 1");
        let m = p
            .legal_moves()
            .iter()
            .copied()
            .find(|m| m.from() == Square::D5 && m.to() == Square::D3)
            .unwrap();
        assert_eq!(p.san(m).unwrap().to_string(), "Qd5d3");
        assert_eq!(p.parse_san("Qd5d3", false).unwrap(), m);
    }

    #[test]
    fn promotion_encoding() {
        let p = pos("8/P7/8/8/8/8/k7/4K3 w - - 0 1");
        let m = p.parse_san("a8=Q", false).unwrap();
        assert_eq!(m.promotion_type(), Some(PieceType::Queen));
        assert_eq!(p.san(m).unwrap().to_string(), "a8=Q");
        // the '=' is optional on input
        assert_eq!(p.parse_san("a8Q", false).unwrap(), m);
        let m = p.parse_san("a8=N", false).unwrap();
        assert_eq!(m.promotion_type(), Some(PieceType::Knight));
    }

    #[test]
    fn check_and_mate_suffixes() {
        let p = pos("4k3/8/8/8/8/8/1R6/R3K3 w - - 0 1");
        let m = p.parse_san("Re2", false).unwrap();
        assert_eq!(p.san(m).unwrap().to_string(), "Re2+");
        // ladder mate: one rook seals the seventh rank, the other arrives
        let p = pos("4k3/R7/8/8/8/8/8/1R4K1 w - - 0 1");
        let m = p.parse_san("Rb8", false).unwrap();
        assert_eq!(p.san(m).unwrap().to_string(), "Rb8#");
    }

    #[test]
    fn annotations_are_ignored_on_input() {
        let p = Position::startpos();
        let plain = p.parse_san("e4", false).unwrap();
        for decorated in ["e4!", "e4?", "e4!!", "e4??", "e4!?", "e4?!", "e4+", "e4#"] {
            assert_eq!(p.parse_san(decorated, false).unwrap(), plain);
        }
    }

    #[test]
    fn unknown_and_garbage_input() {
        let p = Position::startpos();
        assert!(matches!(
            p.parse_san("e5", false),
            Err(SanError::Unknown(_))
        ));
        assert!(p.parse_san("Ze4", false).is_err());
        assert!(p.parse_san("", false).is_err());
        assert!(p.parse_san("xxxx", true).is_err());
        assert!(p.parse_san("O-O", false).is_err());
    }

    #[test]
    fn sloppy_accepts_over_disambiguation_of_pinned_pieces() {
        // the c6 knight is pinned by the b5 bishop, so strictly only the g8
        // knight can reach e7 and "Ne7" is canonical; engines that
        // disambiguate against pseudo-legal movers write "Nge7"
        let p = pos("r1bqkbnr/ppp2ppp/2n5/1B1pP3/4P3/8/PPPP2PP/RNBQK1NR b KQkq - 2 4");
        assert!(p.parse_san("Nge7", false).is_err());
        let m = p.parse_san("Nge7", true).unwrap();
        assert_eq!(m.from(), Square::G8);
        assert_eq!(m.to(), Square::E7);
        // and the sloppy encoder produces exactly that text
        assert_eq!(p.san_sloppy(m).unwrap().to_string(), "Nge7");
        assert_eq!(p.san(m).unwrap().to_string(), "Ne7");
        assert_eq!(p.parse_san("Ne7", false).unwrap(), m);
    }

    #[test]
    fn sloppy_accepts_long_algebraic() {
        let p = Position::startpos();
        let e4 = p.parse_san("e4", false).unwrap();
        assert!(p.parse_san("e2e4", false).is_err());
        assert_eq!(p.parse_san("e2e4", true).unwrap(), e4);
        assert_eq!(p.parse_san("e2-e4", true).unwrap(), e4);
        assert_eq!(p.parse_san("Pe2e4", true).unwrap(), e4);
        assert_eq!(p.parse_san("E2E4", true).unwrap(), e4);

        let nf3 = p.parse_san("Nf3", false).unwrap();
        assert_eq!(p.parse_san("g1f3", true).unwrap(), nf3);
        assert_eq!(p.parse_san("Ng1f3", true).unwrap(), nf3);
    }

    #[test]
    fn sloppy_long_algebraic_castling_and_promotion() {
        let p = pos("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1");
        let m = p.parse_san("e1g1", true).unwrap();
        assert!(m.is_kingside_castle());

        let p = pos("8/P7/8/8/8/8/k7/4K3 w - - 0 1");
        let m = p.parse_san("a7a8q", true).unwrap();
        assert_eq!(m.promotion_type(), Some(PieceType::Queen));
        // without the promotion piece the move is underspecified
        assert!(p.parse_san("a7a8", true).is_err());
    }

    #[test]
    fn round_trip_over_midgame_positions() {
        let fens = [
            Position::STARTING_FEN,
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
            "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
            "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
        ];
        for fen in fens {
            let p = pos(fen);
            for &m in &p.legal_moves() {
                let text = p.san(m).unwrap().to_string();
                let parsed = p
                    .parse_san(&text, false)
                    .unwrap_or_else(|e| panic!("{text} failed to parse back: {e}"));
                assert_eq!(parsed, m, "round trip failed for {text} in {fen}");
            }
        }
    }

    #[test]
    fn sloppy_round_trip() {
        let p = pos("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
        for &m in &p.legal_moves() {
            let text = p.san_sloppy(m).unwrap().to_string();
            assert_eq!(p.parse_san(&text, true).unwrap(), m, "sloppy {text}");
        }
    }

    #[test]
    fn san_rejects_illegal_moves() {
        let p = Position::startpos();
        assert!(p.san(Move::new(Square::E2, Square::E5)).is_none());
        assert!(p
            .san(Move::new_with_flags(
                Square::E1,
                Square::G1,
                MoveFlags::Castle
            ))
            .is_none());
    }
}
