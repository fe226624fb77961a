//! Portable Game Notation: a tree model for games, a streaming parser, and
//! a serializer.
//!
//! Parsing preserves movetext tokens verbatim and does not validate them;
//! [`Game::mainline`] and [`Game::replay`] check legality against a running
//! [`Position`] afterwards, so a caller can either reject a whole game on
//! the first illegal move or keep the prefix parsed so far.

mod comment;
mod parse;
mod write;

pub use comment::{ClockTime, ColouredArrow, ColouredSquare, Comment, Eval, ShapeColour};
pub use parse::{parse_pgn, PgnReader};
pub use write::WriteOptions;

use crate::{
    chessmove::Move,
    errors::PgnError,
    position::Position,
};

/// Game termination marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Outcome {
    WhiteWins,
    BlackWins,
    Draw,
    #[default]
    Unknown,
}

impl Outcome {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WhiteWins => "1-0",
            Self::BlackWins => "0-1",
            Self::Draw => "1/2-1/2",
            Self::Unknown => "*",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "1-0" => Some(Self::WhiteWins),
            "0-1" => Some(Self::BlackWins),
            "1/2-1/2" => Some(Self::Draw),
            "*" => Some(Self::Unknown),
            _ => None,
        }
    }
}

/// One move of a game tree: the SAN token as it appeared in the source,
/// its annotations, and any alternative lines branching off in its place.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MoveNode {
    pub san: String,
    pub nags: Vec<u16>,
    pub pre_comments: Vec<Comment>,
    pub comments: Vec<Comment>,
    /// Recursive annotation variations: each is an alternative to *this*
    /// move, continuing from the position before it.
    pub variations: Vec<Vec<MoveNode>>,
}

impl MoveNode {
    pub fn new(san: impl Into<String>) -> Self {
        Self {
            san: san.into(),
            ..Self::default()
        }
    }

    /// Null-move tokens pass the turn instead of moving a piece.
    pub fn is_null(&self) -> bool {
        matches!(self.san.as_str(), "--" | "Z0" | "0000" | "@@@@")
    }
}

/// A whole game: ordered headers, the movetext tree, and the termination
/// marker found in the movetext.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Game {
    pub headers: Vec<(String, String)>,
    /// Comments standing before the first move.
    pub root_comments: Vec<Comment>,
    /// The main line; variations hang off individual nodes.
    pub moves: Vec<MoveNode>,
    pub result: Outcome,
}

impl Game {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Replace the value of `name`, or append it, keeping header order.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.headers.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value,
            None => self.headers.push((name.to_string(), value)),
        }
    }

    /// The position the game starts from: the `FEN` header when
    /// `SetUp "1"` is present, the standard starting position otherwise.
    pub fn start_position(&self) -> Result<Position, PgnError> {
        if self.header("SetUp") == Some("1") {
            if let Some(fen) = self.header("FEN") {
                return Ok(Position::from_fen(fen)?);
            }
        }
        Ok(Position::startpos())
    }

    /// Walk the main line, yielding each position and the move played from
    /// it. Stops early with [`PgnError::IllegalMove`] when a SAN token does
    /// not name a legal move; callers that want the valid prefix can simply
    /// stop consuming at the error.
    pub fn mainline(&self) -> Result<Mainline<'_>, PgnError> {
        Ok(Mainline {
            nodes: self.moves.iter(),
            position: self.start_position()?,
            done: false,
        })
    }

    /// Replay the whole main line, rejecting the game on the first illegal
    /// move.
    pub fn replay(&self) -> Result<Vec<(Position, Move)>, PgnError> {
        self.mainline()?.collect()
    }

    /// The position after the last main-line move.
    pub fn final_position(&self) -> Result<Position, PgnError> {
        let mut mainline = self.mainline()?;
        for step in &mut mainline {
            step?;
        }
        Ok(mainline.position)
    }
}

/// Iterator over `(position, move)` pairs of a game's main line.
pub struct Mainline<'a> {
    nodes: std::slice::Iter<'a, MoveNode>,
    position: Position,
    done: bool,
}

impl Iterator for Mainline<'_> {
    type Item = Result<(Position, Move), PgnError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let node = self.nodes.next()?;
            if node.is_null() {
                self.position = self.position.apply_null();
                continue;
            }
            let move_number = self.position.fullmove_number().get();
            return match self.position.parse_san(&node.san, true) {
                Ok(m) => {
                    let before = self.position.clone();
                    self.position = self.position.apply(m);
                    Some(Ok((before, m)))
                }
                Err(_) => {
                    self.done = true;
                    Some(Err(PgnError::IllegalMove {
                        san: node.san.clone(),
                        move_number,
                    }))
                }
            };
        }
    }
}
