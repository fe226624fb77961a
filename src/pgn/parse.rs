//! Streaming PGN parser.
//!
//! [`PgnReader`] pulls games one at a time out of a single input string,
//! following the classic line-oriented state machine: an optional byte-order
//! mark, escape (`%`) and blank lines, a header block of `[Tag "Value"]`
//! pairs, then movetext until a termination marker. Comments may span lines.
//! Movetext tokens are preserved verbatim; nothing is checked against the
//! rules of chess here.

use std::sync::LazyLock;

use regex::Regex;

use crate::errors::PgnError;
use crate::pgn::{Comment, Game, MoveNode, Outcome};

/// Pull-based reader: an iterator of games over one PGN document.
pub struct PgnReader<'a> {
    lines: std::str::Lines<'a>,
    pushed_back: Option<&'a str>,
}

/// Parse every game in the input. The default, strictest driver: the first
/// syntax error aborts the whole document.
pub fn parse_pgn(input: &str) -> Result<Vec<Game>, PgnError> {
    PgnReader::new(input).collect()
}

impl<'a> PgnReader<'a> {
    pub fn new(input: &'a str) -> Self {
        let input = input.strip_prefix('\u{feff}').unwrap_or(input);
        Self {
            lines: input.lines(),
            pushed_back: None,
        }
    }

    fn next_line(&mut self) -> Option<&'a str> {
        self.pushed_back.take().or_else(|| self.lines.next())
    }

    fn read_game(&mut self) -> Option<Result<Game, PgnError>> {
        let mut game = Game::new();
        let mut saw_headers = false;

        // pre + headers
        loop {
            let Some(line) = self.next_line() else {
                if saw_headers {
                    break;
                }
                return None;
            };
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('%') || trimmed.starts_with(';') {
                if saw_headers && trimmed.is_empty() {
                    break;
                }
                continue;
            }
            if trimmed.starts_with('[') {
                match parse_header_line(trimmed) {
                    Ok((name, value)) => game.headers.push((name, value)),
                    Err(e) => return Some(Err(e)),
                }
                saw_headers = true;
            } else {
                // movetext with no separating blank line
                self.pushed_back = Some(line);
                break;
            }
        }

        // movetext
        let mut movetext = MovetextParser::new();
        loop {
            let Some(line) = self.next_line() else {
                break;
            };
            let trimmed = line.trim();
            if !movetext.in_comment() {
                if trimmed.starts_with('[') && (saw_headers || movetext.saw_tokens()) {
                    // the next game's header block begins
                    self.pushed_back = Some(line);
                    break;
                }
                if trimmed.starts_with('%') {
                    continue;
                }
            }
            if let Err(e) = movetext.feed_line(line) {
                return Some(Err(e));
            }
            if movetext.finished() {
                break;
            }
        }

        if movetext.in_comment() {
            return Some(Err(PgnError::UnterminatedComment));
        }

        let had_content = saw_headers || movetext.saw_tokens();
        movetext.finish(&mut game);
        if had_content {
            Some(Ok(game))
        } else {
            None
        }
    }
}

impl Iterator for PgnReader<'_> {
    type Item = Result<Game, PgnError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_game()
    }
}

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\[\s*([A-Za-z0-9_]+)\s+"((?:[^"\\]|\\.)*)"\s*\]$"#).unwrap()
});

fn parse_header_line(line: &str) -> Result<(String, String), PgnError> {
    let caps = HEADER_RE
        .captures(line)
        .ok_or_else(|| PgnError::MalformedHeader(line.to_string()))?;
    Ok((caps[1].to_string(), unescape(&caps[2])))
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next @ ('"' | '\\')) => out.push(next),
                Some(next) => {
                    out.push(c);
                    out.push(next);
                }
                None => out.push(c),
            }
        } else {
            out.push(c);
        }
    }
    out
}

static MOVE_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.*$").unwrap());
static GLUED_MOVE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.+(.+)$").unwrap());
static NAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\$(\d+)$").unwrap());
static SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[!?]{1,2}$").unwrap());

fn suffix_nag(suffix: &str) -> Option<u16> {
    match suffix {
        "!" => Some(1),
        "?" => Some(2),
        "!!" => Some(3),
        "??" => Some(4),
        "!?" => Some(5),
        "?!" => Some(6),
        _ => None,
    }
}

struct MovetextParser {
    root_comments: Vec<Comment>,
    stack: Vec<Vec<MoveNode>>,
    pending_pre: Vec<Comment>,
    comment_buf: Option<String>,
    result: Option<Outcome>,
    saw_tokens: bool,
}

impl MovetextParser {
    fn new() -> Self {
        Self {
            root_comments: Vec::new(),
            stack: vec![Vec::new()],
            pending_pre: Vec::new(),
            comment_buf: None,
            result: None,
            saw_tokens: false,
        }
    }

    fn in_comment(&self) -> bool {
        self.comment_buf.is_some()
    }

    fn finished(&self) -> bool {
        self.result.is_some()
    }

    fn saw_tokens(&self) -> bool {
        self.saw_tokens
    }

    fn feed_line(&mut self, line: &str) -> Result<(), PgnError> {
        let mut rest = line;

        if let Some(buf) = &mut self.comment_buf {
            match rest.find('}') {
                Some(end) => {
                    buf.push(' ');
                    buf.push_str(&rest[..end]);
                    let comment = Comment::parse(buf);
                    self.comment_buf = None;
                    self.attach_comment(comment);
                    rest = &rest[end + 1..];
                }
                None => {
                    buf.push(' ');
                    buf.push_str(rest);
                    return Ok(());
                }
            }
        }

        loop {
            rest = rest.trim_start();
            let Some(first) = rest.chars().next() else {
                return Ok(());
            };
            match first {
                '{' => {
                    let body = &rest[1..];
                    match body.find('}') {
                        Some(end) => {
                            self.attach_comment(Comment::parse(&body[..end]));
                            rest = &body[end + 1..];
                        }
                        None => {
                            self.comment_buf = Some(body.to_string());
                            return Ok(());
                        }
                    }
                }
                ';' => {
                    self.attach_comment(Comment::parse(&rest[1..]));
                    return Ok(());
                }
                '(' => {
                    self.stack.push(Vec::new());
                    rest = &rest[1..];
                }
                ')' => {
                    self.close_variation();
                    rest = &rest[1..];
                }
                _ => {
                    let end = rest
                        .find(|c: char| c.is_whitespace() || "{}();".contains(c))
                        .unwrap_or(rest.len());
                    let (word, tail) = rest.split_at(end);
                    self.consume_word(word);
                    rest = tail;
                    if self.finished() {
                        return Ok(());
                    }
                }
            }
        }
    }

    fn consume_word(&mut self, word: &str) {
        if let Some(outcome) = Outcome::from_token(word) {
            self.saw_tokens = true;
            self.result = Some(outcome);
            return;
        }
        // null moves before move numbers: "0000" is all digits
        if matches!(word, "--" | "Z0" | "0000" | "@@@@") {
            let mut node = MoveNode::new(word);
            node.pre_comments = std::mem::take(&mut self.pending_pre);
            self.current_line().push(node);
            self.saw_tokens = true;
            return;
        }
        if MOVE_NUMBER_RE.is_match(word) {
            self.saw_tokens = true;
            return;
        }
        if let Some(caps) = NAG_RE.captures(word) {
            if let Ok(nag) = caps[1].parse::<u16>() {
                self.attach_nag(nag);
            }
            self.saw_tokens = true;
            return;
        }
        if let Some(nag) = suffix_nag(word) {
            self.attach_nag(nag);
            self.saw_tokens = true;
            return;
        }

        // "1.e4" with the number glued to the move
        let word = match GLUED_MOVE_RE.captures(word) {
            Some(caps) => caps.get(1).unwrap().as_str(),
            None => word,
        };

        // a trailing "!?"-style annotation folds into the standard NAGs
        let (san, suffix) = match SUFFIX_RE.find(word) {
            Some(found) => word.split_at(found.start()),
            None => (word, ""),
        };
        if san.is_empty() {
            return;
        }

        let mut node = MoveNode::new(san);
        node.pre_comments = std::mem::take(&mut self.pending_pre);
        self.current_line().push(node);
        self.saw_tokens = true;
        if let Some(nag) = suffix_nag(suffix) {
            self.attach_nag(nag);
        }
    }

    fn current_line(&mut self) -> &mut Vec<MoveNode> {
        self.stack.last_mut().expect("line stack is never empty")
    }

    fn attach_comment(&mut self, comment: Comment) {
        let at_mainline_root = self.stack.len() == 1;
        let line = self.current_line();
        if let Some(last) = line.last_mut() {
            last.comments.push(comment);
        } else if at_mainline_root {
            self.root_comments.push(comment);
        } else {
            self.pending_pre.push(comment);
        }
    }

    fn attach_nag(&mut self, nag: u16) {
        if let Some(last) = self.current_line().last_mut() {
            last.nags.push(nag);
        }
    }

    fn close_variation(&mut self) {
        if self.stack.len() == 1 {
            return;
        }
        self.pending_pre.clear();
        let line = self.stack.pop().expect("checked above");
        if let Some(node) = self.current_line().last_mut() {
            node.variations.push(line);
        }
    }

    fn finish(mut self, game: &mut Game) {
        while self.stack.len() > 1 {
            self.close_variation();
        }
        game.root_comments = self.root_comments;
        game.moves = self.stack.pop().unwrap_or_default();
        game.result = self.result.unwrap_or_default();
    }
}
