//! A chess rules core.
//!
//! This crate knows the rules of standard chess and the text formats the
//! chess world runs on, and nothing else: no evaluation, no search, no I/O.
//!
//! - [`Position`] is an immutable value describing a position. Applying a
//!   move produces a fresh position; nothing is ever mutated in place.
//! - [`Position::legal_moves`] enumerates legal moves,
//!   [`Position::apply`] plays one, and the `in_*`/`is_*` predicates detect
//!   check, checkmate, stalemate, and the draw conditions.
//! - [`Fen`] converts positions to and from Forsyth-Edwards Notation.
//! - [`Position::san`] and [`Position::parse_san`] convert moves to and from
//!   Standard Algebraic Notation, including a sloppy mode that tolerates
//!   long algebraic input and over-disambiguation.
//! - [`pgn`] reads and writes whole games, preserving comments, numeric
//!   annotation glyphs, and recursive variations.
//!
//! ```
//! use fianchetto::Position;
//!
//! let mut pos = Position::startpos();
//! for san in ["e4", "e5", "Nf3", "Nc6", "Bb5", "a6"] {
//!     let m = pos.parse_san(san, false).unwrap();
//!     pos = pos.apply(m);
//! }
//! assert_eq!(
//!     pos.fen(),
//!     "r1bqkbnr/1ppp1ppp/p1n5/1B2p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 0 4"
//! );
//! ```

pub mod attacks;
pub mod chessmove;
pub mod errors;
pub mod fen;
pub mod perft;
pub mod pgn;
pub mod piece;
pub mod piecelayout;
pub mod position;
pub mod squareset;
pub mod types;

pub use chessmove::Move;
pub use errors::{FenParseError, PgnError, SanError};
pub use fen::Fen;
pub use perft::perft;
pub use piece::{Colour, Piece, PieceType};
pub use position::movegen::MoveList;
pub use position::{is_threefold_repetition, CheckState, Position};
pub use squareset::SquareSet;
pub use types::{CastlingRights, File, Rank, Square};
