//! PGN comments and the structured annotations embedded in them.
//!
//! Analysis tools hide machine-readable data inside `{ }` comments:
//! `[%clk 0:03:07]` for clock state, `[%emt 0:00:11]` for elapsed move
//! time, `[%eval -0.32]` or `[%eval #4]` for engine evaluations, and
//! `[%csl Ra4]` / `[%cal Gd2d4]` for coloured squares and arrows. Parsing
//! lifts these into typed fields and leaves the human-readable residue in
//! [`Comment::text`].

use std::{
    fmt::{self, Display, Formatter},
    sync::LazyLock,
};

use regex::Regex;

use crate::types::Square;

/// `H:MM:SS` with optional milliseconds, as used by `[%clk]` and `[%emt]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClockTime {
    pub hours: u32,
    pub minutes: u8,
    pub seconds: u8,
    pub millis: u16,
}

impl ClockTime {
    fn parse(h: &str, m: &str, s: &str, frac: Option<&str>) -> Self {
        let millis = frac.map_or(0, |f| {
            // ".5" means 500ms, ".05" means 50ms
            let padded = format!("{f:0<3}");
            padded.parse().unwrap_or(0)
        });
        Self {
            hours: h.parse().unwrap_or(0),
            minutes: m.parse().unwrap_or(0),
            seconds: s.parse().unwrap_or(0),
            millis,
        }
    }
}

impl Display for ClockTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}:{:02}", self.hours, self.minutes, self.seconds)?;
        if self.millis > 0 {
            write!(f, ".{:03}", self.millis)?;
        }
        Ok(())
    }
}

/// An engine evaluation: centipawns from white's point of view, or a
/// forced mate in a signed number of moves. Either may carry a depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eval {
    Centipawns { value: i32, depth: Option<u32> },
    Mate { moves: i32, depth: Option<u32> },
}

impl Display for Eval {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Centipawns { value, depth } => {
                let sign = if value < 0 { "-" } else { "" };
                let value = value.unsigned_abs();
                write!(f, "{sign}{}.{:02}", value / 100, value % 100)?;
                if let Some(depth) = depth {
                    write!(f, ",{depth}")?;
                }
                Ok(())
            }
            Self::Mate { moves, depth } => {
                write!(f, "#{moves}")?;
                if let Some(depth) = depth {
                    write!(f, ",{depth}")?;
                }
                Ok(())
            }
        }
    }
}

/// Shape colours understood by annotation-aware GUIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeColour {
    Red,
    Green,
    Yellow,
    Blue,
}

impl ShapeColour {
    pub const fn char(self) -> char {
        match self {
            Self::Red => 'R',
            Self::Green => 'G',
            Self::Yellow => 'Y',
            Self::Blue => 'B',
        }
    }

    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'R' => Some(Self::Red),
            'G' => Some(Self::Green),
            'Y' => Some(Self::Yellow),
            'B' => Some(Self::Blue),
            _ => None,
        }
    }
}

/// A `[%csl]` highlighted square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColouredSquare {
    pub colour: ShapeColour,
    pub square: Square,
}

/// A `[%cal]` arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColouredArrow {
    pub colour: ShapeColour,
    pub from: Square,
    pub to: Square,
}

/// One `{ }` or `;` comment, with its embedded annotations extracted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Comment {
    /// The human text with annotations removed, whitespace-normalised.
    pub text: String,
    pub clock: Option<ClockTime>,
    pub elapsed: Option<ClockTime>,
    pub eval: Option<Eval>,
    pub squares: Vec<ColouredSquare>,
    pub arrows: Vec<ColouredArrow>,
}

static CLK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[%clk\s+(\d+):(\d{1,2}):(\d{1,2})(?:\.(\d{1,3}))?\]").unwrap()
});
static EMT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[%emt\s+(\d+):(\d{1,2}):(\d{1,2})(?:\.(\d{1,3}))?\]").unwrap()
});
static EVAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[%eval\s+(?:#(-?\d+)|([+-]?\d+(?:\.\d{1,2})?))(?:,(\d+))?\]").unwrap()
});
static CSL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[%csl\s+([RGYB][a-h][1-8](?:\s*,\s*[RGYB][a-h][1-8])*)\]").unwrap()
});
static CAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[%cal\s+([RGYB][a-h][1-8][a-h][1-8](?:\s*,\s*[RGYB][a-h][1-8][a-h][1-8])*)\]")
        .unwrap()
});

impl Comment {
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Parse the raw body of a comment, splitting annotations from text.
    pub fn parse(raw: &str) -> Self {
        let mut out = Self::default();
        let mut residue = raw.to_string();

        if let Some(caps) = CLK_RE.captures(&residue) {
            out.clock = Some(ClockTime::parse(
                &caps[1],
                &caps[2],
                &caps[3],
                caps.get(4).map(|m| m.as_str()),
            ));
            residue = CLK_RE.replace(&residue, " ").into_owned();
        }
        if let Some(caps) = EMT_RE.captures(&residue) {
            out.elapsed = Some(ClockTime::parse(
                &caps[1],
                &caps[2],
                &caps[3],
                caps.get(4).map(|m| m.as_str()),
            ));
            residue = EMT_RE.replace(&residue, " ").into_owned();
        }
        if let Some(caps) = EVAL_RE.captures(&residue) {
            let depth = caps.get(3).and_then(|d| d.as_str().parse().ok());
            out.eval = if let Some(mate) = caps.get(1) {
                mate.as_str()
                    .parse()
                    .ok()
                    .map(|moves| Eval::Mate { moves, depth })
            } else {
                caps.get(2)
                    .and_then(|p| parse_pawns(p.as_str()))
                    .map(|value| Eval::Centipawns { value, depth })
            };
            residue = EVAL_RE.replace(&residue, " ").into_owned();
        }
        if let Some(caps) = CSL_RE.captures(&residue) {
            for item in caps[1].split(',') {
                let item = item.trim();
                let mut chars = item.chars();
                let colour = chars.next().and_then(ShapeColour::from_char);
                let square = chars.as_str().parse::<Square>().ok();
                if let (Some(colour), Some(square)) = (colour, square) {
                    out.squares.push(ColouredSquare { colour, square });
                }
            }
            residue = CSL_RE.replace(&residue, " ").into_owned();
        }
        if let Some(caps) = CAL_RE.captures(&residue) {
            for item in caps[1].split(',') {
                let item = item.trim();
                let mut chars = item.chars();
                let colour = chars.next().and_then(ShapeColour::from_char);
                let rest = chars.as_str();
                let (from, to) = rest.split_at(2);
                if let (Some(colour), Ok(from), Ok(to)) =
                    (colour, from.parse::<Square>(), to.parse::<Square>())
                {
                    out.arrows.push(ColouredArrow { colour, from, to });
                }
            }
            residue = CAL_RE.replace(&residue, " ").into_owned();
        }

        out.text = residue.split_whitespace().collect::<Vec<_>>().join(" ");
        out
    }
}

fn parse_pawns(s: &str) -> Option<i32> {
    let (sign, digits) = match s.as_bytes().first()? {
        b'-' => (-1, &s[1..]),
        b'+' => (1, &s[1..]),
        _ => (1, s),
    };
    let (whole, frac) = match digits.split_once('.') {
        Some((w, f)) => (w, f),
        None => (digits, ""),
    };
    let whole: i32 = whole.parse().ok()?;
    let frac: i32 = match frac.len() {
        0 => 0,
        1 => frac.parse::<i32>().ok()? * 10,
        _ => frac[..2].parse().ok()?,
    };
    Some(sign * (whole * 100 + frac))
}

impl Display for Comment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        if !self.text.is_empty() {
            write!(f, "{}", self.text)?;
            sep = " ";
        }
        if let Some(clock) = &self.clock {
            write!(f, "{sep}[%clk {clock}]")?;
            sep = " ";
        }
        if let Some(elapsed) = &self.elapsed {
            write!(f, "{sep}[%emt {elapsed}]")?;
            sep = " ";
        }
        if let Some(eval) = &self.eval {
            write!(f, "{sep}[%eval {eval}]")?;
            sep = " ";
        }
        if !self.squares.is_empty() {
            let items: Vec<String> = self
                .squares
                .iter()
                .map(|s| format!("{}{}", s.colour.char(), s.square))
                .collect();
            write!(f, "{sep}[%csl {}]", items.join(","))?;
            sep = " ";
        }
        if !self.arrows.is_empty() {
            let items: Vec<String> = self
                .arrows
                .iter()
                .map(|a| format!("{}{}{}", a.colour.char(), a.from, a.to))
                .collect();
            write!(f, "{sep}[%cal {}]", items.join(","))?;
        }
        Ok(())
    }
}
