//! PGN serialization: header block, movetext with move-number markers,
//! comments, NAGs, variations, and optional line wrapping.

use crate::{
    pgn::{Comment, Game, MoveNode},
    piece::Colour,
    position::Position,
};

/// Output settings for [`Game::to_pgn`].
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Wrap movetext lines at this width; `None` emits a single line.
    /// Tokens and comment words are never split.
    pub max_width: Option<usize>,
    /// Line terminator for headers and wrapping.
    pub newline: String,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            max_width: None,
            newline: "\n".to_string(),
        }
    }
}

impl WriteOptions {
    pub fn wrapped(max_width: usize) -> Self {
        Self {
            max_width: Some(max_width),
            ..Self::default()
        }
    }
}

/// The seven tag roster every exported game carries, with its placeholder
/// values.
const ROSTER: [(&str, &str); 7] = [
    ("Event", "?"),
    ("Site", "?"),
    ("Date", "????.??.??"),
    ("Round", "?"),
    ("White", "?"),
    ("Black", "?"),
    ("Result", "*"),
];

impl Game {
    pub fn to_pgn(&self, options: &WriteOptions) -> String {
        let nl = &options.newline;
        let mut out = String::new();

        let result = self
            .header("Result")
            .unwrap_or_else(|| self.result.as_str());

        for (name, placeholder) in ROSTER {
            let value = match name {
                "Result" => result,
                _ => self.header(name).unwrap_or(placeholder),
            };
            out.push_str(&format!("[{name} \"{}\"]{nl}", escape(value)));
        }
        for (name, value) in &self.headers {
            if ROSTER.iter().any(|(roster_name, _)| roster_name == name) {
                continue;
            }
            out.push_str(&format!("[{name} \"{}\"]{nl}", escape(value)));
        }
        out.push_str(nl);

        let start = self
            .start_position()
            .unwrap_or_else(|_| Position::startpos());
        let mut writer = TokenWriter::new(options);
        for comment in &self.root_comments {
            writer.push_comment(comment);
        }
        write_line(
            &mut writer,
            &self.moves,
            start.fullmove_number().get(),
            start.turn(),
            true,
        );
        writer.push_token(result);

        out.push_str(&writer.finish());
        out.push_str(nl);
        out
    }
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn write_line(
    writer: &mut TokenWriter<'_>,
    nodes: &[MoveNode],
    mut number: u32,
    mut side: Colour,
    mut force_marker: bool,
) {
    for node in nodes {
        for comment in &node.pre_comments {
            writer.push_comment(comment);
            force_marker = true;
        }

        if side == Colour::White {
            writer.push_token(&format!("{number}."));
        } else if force_marker {
            writer.push_token(&format!("{number}..."));
        }
        force_marker = false;

        writer.push_token(&node.san);
        for nag in &node.nags {
            writer.push_token(&format!("${nag}"));
        }
        for comment in &node.comments {
            writer.push_comment(comment);
            force_marker = true;
        }
        for variation in &node.variations {
            writer.push_token("(");
            write_line(writer, variation, number, side, true);
            writer.push_token(")");
            force_marker = true;
        }

        if side == Colour::Black {
            number += 1;
        }
        side = !side;
    }
}

/// Emits space-separated tokens, breaking lines at the configured width.
struct TokenWriter<'a> {
    out: String,
    line_len: usize,
    max_width: Option<usize>,
    newline: &'a str,
}

impl<'a> TokenWriter<'a> {
    fn new(options: &'a WriteOptions) -> Self {
        Self {
            out: String::new(),
            line_len: 0,
            max_width: options.max_width,
            newline: &options.newline,
        }
    }

    fn push_token(&mut self, token: &str) {
        if self.line_len == 0 {
            self.out.push_str(token);
            self.line_len = token.len();
        } else if self
            .max_width
            .is_some_and(|w| self.line_len + 1 + token.len() > w)
        {
            self.out.push_str(self.newline);
            self.out.push_str(token);
            self.line_len = token.len();
        } else {
            self.out.push(' ');
            self.out.push_str(token);
            self.line_len += 1 + token.len();
        }
    }

    /// A comment is wrapped word-by-word so no word is ever split, with the
    /// braces glued to the first and last words.
    fn push_comment(&mut self, comment: &Comment) {
        let body = comment.to_string();
        let mut words = body.split_whitespace().peekable();
        let Some(first) = words.next() else {
            self.push_token("{}");
            return;
        };
        if words.peek().is_none() {
            self.push_token(&format!("{{{first}}}"));
            return;
        }
        self.push_token(&format!("{{{first}"));
        while let Some(word) = words.next() {
            if words.peek().is_none() {
                self.push_token(&format!("{word}}}"));
            } else {
                self.push_token(word);
            }
        }
    }

    fn finish(self) -> String {
        self.out
    }
}
