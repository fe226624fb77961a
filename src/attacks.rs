//! Precomputed attack tables and ray walkers.
//!
//! Everything here is a pure function of the geometry of the board, built at
//! compile time by generators that the tests re-derive from first principles.

use crate::{
    piece::{Colour, PieceType},
    squareset::SquareSet,
    types::Square,
};

const KNIGHT_DELTAS: [(i32, i32); 8] = [
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
];

const KING_DELTAS: [(i32, i32); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

const BISHOP_DELTAS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ROOK_DELTAS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

const fn jumping_attacks(deltas: &[(i32, i32); 8]) -> [SquareSet; 64] {
    let mut table = [SquareSet::EMPTY; 64];
    let mut sq = 0;
    while sq < 64 {
        let rank = (sq / 8) as i32;
        let file = (sq % 8) as i32;
        let mut bb = 0u64;
        let mut i = 0;
        while i < 8 {
            let (dr, df) = deltas[i];
            let (r, f) = (rank + dr, file + df);
            if 0 <= r && r < 8 && 0 <= f && f < 8 {
                bb |= 1 << (r * 8 + f);
            }
            i += 1;
        }
        table[sq] = SquareSet::from_inner(bb);
        sq += 1;
    }
    table
}

static KNIGHT_ATTACKS: [SquareSet; 64] = jumping_attacks(&KNIGHT_DELTAS);
static KING_ATTACKS: [SquareSet; 64] = jumping_attacks(&KING_DELTAS);

const fn sliding_attacks(sq: usize, blockers: u64, deltas: &[(i32, i32); 4]) -> u64 {
    let mut bb = 0u64;
    let rank = (sq / 8) as i32;
    let file = (sq % 8) as i32;
    let mut i = 0;
    while i < 4 {
        let (dr, df) = deltas[i];
        let (mut r, mut f) = (rank + dr, file + df);
        while 0 <= r && r < 8 && 0 <= f && f < 8 {
            let step = 1u64 << (r * 8 + f);
            bb |= step;
            if blockers & step != 0 {
                break;
            }
            r += dr;
            f += df;
        }
        i += 1;
    }
    bb
}

/// Squares a bishop on `sq` attacks, rays stopping at the first blocker
/// (the blocking square itself is attacked).
pub const fn bishop_attacks(sq: Square, blockers: SquareSet) -> SquareSet {
    SquareSet::from_inner(sliding_attacks(sq.index(), blockers.inner(), &BISHOP_DELTAS))
}

/// Squares a rook on `sq` attacks, rays stopping at the first blocker.
pub const fn rook_attacks(sq: Square, blockers: SquareSet) -> SquareSet {
    SquareSet::from_inner(sliding_attacks(sq.index(), blockers.inner(), &ROOK_DELTAS))
}

pub fn knight_attacks(sq: Square) -> SquareSet {
    KNIGHT_ATTACKS[sq]
}

pub fn king_attacks(sq: Square) -> SquareSet {
    KING_ATTACKS[sq]
}

/// Squares attacked by pawns of `side` occupying `pawns`.
pub fn pawn_attacks(pawns: SquareSet, side: Colour) -> SquareSet {
    match side {
        Colour::White => pawns.north_east_one() | pawns.north_west_one(),
        Colour::Black => pawns.south_east_one() | pawns.south_west_one(),
    }
}

/// Attack set for any non-pawn piece kind. Pawns attack asymmetrically by
/// colour and are handled by [`pawn_attacks`].
pub fn attacks_by_type(pt: PieceType, sq: Square, blockers: SquareSet) -> SquareSet {
    match pt {
        PieceType::Pawn => {
            debug_assert!(false, "pawn attacks are colour-dependent");
            SquareSet::EMPTY
        }
        PieceType::Knight => knight_attacks(sq),
        PieceType::Bishop => bishop_attacks(sq, blockers),
        PieceType::Rook => rook_attacks(sq, blockers),
        PieceType::Queen => bishop_attacks(sq, blockers) | rook_attacks(sq, blockers),
        PieceType::King => king_attacks(sq),
    }
}

const fn between(a: usize, b: usize) -> u64 {
    let (ar, af) = ((a / 8) as i32, (a % 8) as i32);
    let (br, bf) = ((b / 8) as i32, (b % 8) as i32);
    let (rd, fd) = (br - ar, bf - af);
    let same_rank = rd == 0;
    let same_file = fd == 0;
    let same_diag = rd == fd || rd == -fd;
    if a == b || !(same_rank || same_file || same_diag) {
        return 0;
    }
    let dr = if rd > 0 {
        1
    } else if rd < 0 {
        -1
    } else {
        0
    };
    let df = if fd > 0 {
        1
    } else if fd < 0 {
        -1
    } else {
        0
    };
    let mut bb = 0u64;
    let (mut r, mut f) = (ar + dr, af + df);
    while !(r == br && f == bf) {
        bb |= 1 << (r * 8 + f);
        r += dr;
        f += df;
    }
    bb
}

/// Squares strictly between two squares sharing a rank, file, or diagonal;
/// empty for unaligned pairs.
pub static RAY_BETWEEN: [[SquareSet; 64]; 64] = {
    let mut table = [[SquareSet::EMPTY; 64]; 64];
    let mut from = 0;
    while from < 64 {
        let mut to = 0;
        while to < 64 {
            table[from][to] = SquareSet::from_inner(between(from, to));
            to += 1;
        }
        from += 1;
    }
    table
};
