//! Comment-stripping scanner for C-family source text.
//!
//! Removes `//` line comments and `/* */` block comments while leaving the
//! contents of `'…'`, `"…"` and `` `…` `` literals untouched. This is not a
//! tokenizer: it only tracks enough state to know whether a comment opener
//! sits inside a literal.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Scanner state. Exactly one is active at any point of the pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    InSingleQuote,
    InDoubleQuote,
    InTemplate,
    InLineComment,
    InBlockComment,
}

impl State {
    fn quote_for(byte: u8) -> Option<State> {
        match byte {
            b'\'' => Some(State::InSingleQuote),
            b'"' => Some(State::InDoubleQuote),
            b'`' => Some(State::InTemplate),
            _ => None,
        }
    }

    fn closing_quote(self) -> Option<u8> {
        match self {
            State::InSingleQuote => Some(b'\''),
            State::InDoubleQuote => Some(b'"'),
            State::InTemplate => Some(b'`'),
            _ => None,
        }
    }

    fn unterminated_kind(self) -> Option<UnterminatedKind> {
        match self {
            State::InSingleQuote => Some(UnterminatedKind::SingleQuote),
            State::InDoubleQuote => Some(UnterminatedKind::DoubleQuote),
            State::InTemplate => Some(UnterminatedKind::Template),
            State::InBlockComment => Some(UnterminatedKind::BlockComment),
            State::Normal | State::InLineComment => None,
        }
    }
}

/// What was left open when the input ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnterminatedKind {
    SingleQuote,
    DoubleQuote,
    Template,
    BlockComment,
}

impl fmt::Display for UnterminatedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnterminatedKind::SingleQuote => write!(f, "single-quoted string"),
            UnterminatedKind::DoubleQuote => write!(f, "double-quoted string"),
            UnterminatedKind::Template => write!(f, "template literal"),
            UnterminatedKind::BlockComment => write!(f, "block comment"),
        }
    }
}

/// A literal or block comment that was still open at end of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unterminated {
    pub kind: UnterminatedKind,
    /// Byte offset of the opening delimiter.
    pub offset: usize,
    /// 1-based line of the opening delimiter.
    pub line: usize,
}

impl fmt::Display for Unterminated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unterminated {} opened on line {}", self.kind, self.line)
    }
}

/// Output of a scan: the cleaned text plus an optional end-of-input diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scan {
    pub cleaned: String,
    pub unterminated: Option<Unterminated>,
}

/// Remove comments from `source`, preserving literal contents.
///
/// Never fails. Unterminated constructs degrade gracefully: an open block
/// comment swallows the rest of the input, an open literal keeps it.
pub fn strip(source: &str) -> String {
    scan(source).cleaned
}

/// Like [`strip`], but also reports a literal or block comment left open at
/// end of input.
pub fn scan(source: &str) -> Scan {
    let bytes = source.as_bytes();
    let mut cleaned = String::with_capacity(source.len());
    let mut state = State::Normal;
    // Start of the pending run of bytes that will be emitted verbatim.
    let mut run_start = 0;
    let mut opened_at = 0;
    let mut i = 0;

    // All delimiters are ASCII, so every index we slice at is a char boundary.
    while i < bytes.len() {
        let byte = bytes[i];
        match state {
            State::Normal => {
                if let Some(quoted) = State::quote_for(byte) {
                    state = quoted;
                    opened_at = i;
                    i += 1;
                } else if byte == b'/' && bytes.get(i + 1) == Some(&b'/') {
                    cleaned.push_str(&source[run_start..i]);
                    state = State::InLineComment;
                    i += 2;
                } else if byte == b'/' && bytes.get(i + 1) == Some(&b'*') {
                    cleaned.push_str(&source[run_start..i]);
                    state = State::InBlockComment;
                    opened_at = i;
                    i += 2;
                } else {
                    i += 1;
                }
            }
            State::InSingleQuote | State::InDoubleQuote | State::InTemplate => {
                if Some(byte) == state.closing_quote()
                    && preceding_escapes(bytes, i, opened_at + 1) % 2 == 0
                {
                    state = State::Normal;
                }
                i += 1;
            }
            State::InLineComment => {
                if byte == b'\n' {
                    // The newline itself is kept.
                    state = State::Normal;
                    run_start = i;
                }
                i += 1;
            }
            State::InBlockComment => {
                if byte == b'*' && bytes.get(i + 1) == Some(&b'/') {
                    state = State::Normal;
                    i += 2;
                    run_start = i;
                } else {
                    i += 1;
                }
            }
        }
    }

    match state {
        State::InLineComment | State::InBlockComment => {}
        _ => cleaned.push_str(&source[run_start..]),
    }

    let unterminated = state.unterminated_kind().map(|kind| Unterminated {
        kind,
        offset: opened_at,
        line: line_of(source, opened_at),
    });

    Scan {
        cleaned,
        unterminated,
    }
}

/// Count consecutive backslashes immediately before `index`, never looking
/// further back than `floor`.
fn preceding_escapes(bytes: &[u8], index: usize, floor: usize) -> usize {
    bytes[floor.min(index)..index]
        .iter()
        .rev()
        .take_while(|&&b| b == b'\\')
        .count()
}

fn line_of(source: &str, offset: usize) -> usize {
    source.as_bytes()[..offset]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
        + 1
}
