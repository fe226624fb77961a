use std::{
    fmt::{self, Debug, Display, Formatter},
    num::NonZeroU16,
};

use crate::{
    piece::PieceType,
    types::{File, Square},
};

/// A move, packed into sixteen bits.
///
/// Layout, low to high: six bits of destination square, six bits of origin
/// square, two bits naming a promotion kind, and a two-bit tag telling
/// plain moves, en passant captures, castlings, and promotions apart.
///
/// Whether a move captures, and whether it is a double pawn push, are
/// properties of the position it is applied to, not of the move itself.
/// Castling is encoded as the king's own movement (e1g1, e1c1, and the black
/// mirrors) with the castle tag set.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Move {
    data: NonZeroU16,
}

const _MOVE_ASSERT: () = assert!(std::mem::size_of::<Move>() == std::mem::size_of::<Option<Move>>());

/// The tag field, pre-shifted into its place in the top two bits.
#[repr(u16)]
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum MoveFlags {
    EnPassant = 0b01 << Move::TAG_SHIFT,
    Castle = 0b10 << Move::TAG_SHIFT,
    Promotion = 0b11 << Move::TAG_SHIFT,
}

impl Move {
    const SIX_BITS: u16 = 0b11_1111;
    const FROM_SHIFT: u32 = 6;
    const KIND_SHIFT: u32 = 12;
    const TAG_SHIFT: u32 = 14;

    fn pack(from: Square, to: Square, kind: u16, tag: u16) -> Self {
        let bits = u16::from(to.inner())
            | u16::from(from.inner()) << Self::FROM_SHIFT
            | kind << Self::KIND_SHIFT
            | tag;
        // from and to never coincide, so one of the square fields is
        // non-zero even with an empty tag
        let data = NonZeroU16::new(bits).expect("packed a null move");
        Self { data }
    }

    pub fn new(from: Square, to: Square) -> Self {
        debug_assert_ne!(from, to, "attempted to construct a null move");
        Self::pack(from, to, 0, 0)
    }

    pub fn new_with_promo(from: Square, to: Square, promotion: PieceType) -> Self {
        debug_assert!(promotion.legal_promo(), "bad promotion {promotion:?}");
        // Knight..Queen occupy the two kind bits as 0..3
        Self::pack(
            from,
            to,
            promotion as u16 - 1,
            MoveFlags::Promotion as u16,
        )
    }

    pub fn new_with_flags(from: Square, to: Square, flags: MoveFlags) -> Self {
        debug_assert_ne!(
            flags,
            MoveFlags::Promotion,
            "promotion flag without a piece kind"
        );
        Self::pack(from, to, 0, flags as u16)
    }

    pub const fn from(self) -> Square {
        let index = (self.data.get() >> Self::FROM_SHIFT) & Self::SIX_BITS;
        match Square::new(index as u8) {
            Some(sq) => sq,
            // a six-bit field cannot hold more than 63
            None => unreachable!(),
        }
    }

    pub const fn to(self) -> Square {
        let index = self.data.get() & Self::SIX_BITS;
        match Square::new(index as u8) {
            Some(sq) => sq,
            None => unreachable!(),
        }
    }

    const fn tag(self) -> u16 {
        self.data.get() >> Self::TAG_SHIFT
    }

    pub const fn is_ep(self) -> bool {
        self.tag() == 0b01
    }

    pub const fn is_castle(self) -> bool {
        self.tag() == 0b10
    }

    pub const fn is_promo(self) -> bool {
        self.tag() == 0b11
    }

    pub fn promotion_type(self) -> Option<PieceType> {
        if !self.is_promo() {
            return None;
        }
        let kind = (self.data.get() >> Self::KIND_SHIFT) & 0b11;
        let out = PieceType::new(kind as u8 + 1).unwrap();
        debug_assert!(out.legal_promo());
        Some(out)
    }

    pub fn is_kingside_castle(self) -> bool {
        self.is_castle() && self.to().file() == File::G
    }

    pub fn is_queenside_castle(self) -> bool {
        self.is_castle() && self.to().file() == File::C
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(promo) = self.promotion_type() {
            let pchar = promo.promo_char().unwrap_or('?');
            write!(f, "{}{}{pchar}", self.from(), self.to())
        } else {
            write!(f, "{}{}", self.from(), self.to())
        }
    }
}

impl Debug for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} (promo {}, ep {}, castle {})",
            self.from(),
            self.to(),
            self.promotion_type()
                .and_then(PieceType::promo_char)
                .unwrap_or('-'),
            self.is_ep(),
            self.is_castle()
        )
    }
}
