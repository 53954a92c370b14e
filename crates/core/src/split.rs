//! Lexical splitting of SQL scripts into statements.
//!
//! A forward scanner walks the script once, tracking whether it is inside a
//! comment, a quoted literal, a quoted identifier, or a dollar-quoted body.
//! Only a `;` seen outside all of those can end a statement. This is not a
//! SQL parser; it only knows enough of PostgreSQL's lexical rules to find
//! statement boundaries.

use std::str::FromStr;

use crate::error::CoreError;

/// Statement terminator.
const TERMINATOR: u8 = b';';

/// When a top-level terminator counts as a statement boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Boundary {
    /// The terminator must end its line: only whitespace, optionally
    /// followed by a `--` comment, may come after it.
    #[default]
    EndOfLine,
    /// Every top-level terminator ends a statement.
    Terminator,
}

impl Boundary {
    /// Whether a terminator followed by `rest` ends a statement.
    fn accepts(self, rest: &str) -> bool {
        match self {
            Boundary::Terminator => true,
            Boundary::EndOfLine => {
                let line = rest.split_once('\n').map_or(rest, |(line, _)| line);
                let line = line.trim_start();
                line.is_empty() || line.starts_with("--")
            }
        }
    }
}

impl FromStr for Boundary {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "end-of-line" | "eol" => Ok(Boundary::EndOfLine),
            "terminator" | "semicolon" => Ok(Boundary::Terminator),
            _ => Err(CoreError::InvalidSetting {
                setting: "statement boundary",
                value: s.to_string(),
                expected: "end-of-line, terminator",
            }),
        }
    }
}

/// A slice of the script between two boundaries.
///
/// The terminator itself is not part of `text`. Fragments are returned
/// untrimmed and may be blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment<'a> {
    /// Byte offset of `text` within the script.
    pub offset: usize,
    pub text: &'a str,
}

#[derive(Debug, Clone, Copy)]
enum Context<'a> {
    Code,
    LineComment,
    /// PostgreSQL block comments nest.
    BlockComment {
        depth: usize,
    },
    Quoted {
        quote: u8,
        backslash_escapes: bool,
    },
    DollarQuoted {
        delimiter: &'a str,
    },
}

/// Split `sql` into fragments at every boundary terminator.
///
/// Unterminated comments and literals run to the end of the input, so the
/// remainder ends up in the last fragment.
///
/// # Examples
///
/// ```
/// use dbsetup_core::split::{split_statements, Boundary};
///
/// let fragments = split_statements("/* a; b; */ SELECT 1;", Boundary::EndOfLine);
/// assert_eq!(fragments.len(), 1);
/// assert_eq!(fragments[0].text, "/* a; b; */ SELECT 1");
/// ```
pub fn split_statements(sql: &str, boundary: Boundary) -> Vec<Fragment<'_>> {
    let bytes = sql.as_bytes();
    let mut fragments = Vec::new();
    let mut context = Context::Code;
    let mut start = 0;
    let mut i = 0;

    // Every delimiter is ASCII, so byte positions at delimiters are always
    // char boundaries.
    while i < bytes.len() {
        let b = bytes[i];
        let next = bytes.get(i + 1).copied();

        match context {
            Context::Code => match b {
                b'-' if next == Some(b'-') => {
                    context = Context::LineComment;
                    i += 2;
                    continue;
                }
                b'/' if next == Some(b'*') => {
                    context = Context::BlockComment { depth: 1 };
                    i += 2;
                    continue;
                }
                b'\'' => {
                    context = Context::Quoted {
                        quote: b'\'',
                        backslash_escapes: is_escape_string_prefix(bytes, i),
                    };
                }
                b'"' => {
                    context = Context::Quoted {
                        quote: b'"',
                        backslash_escapes: false,
                    };
                }
                b'$' => {
                    if let Some(delimiter) = dollar_quote_delimiter(sql, i) {
                        context = Context::DollarQuoted { delimiter };
                        i += delimiter.len();
                        continue;
                    }
                }
                TERMINATOR if boundary.accepts(&sql[i + 1..]) => {
                    fragments.push(Fragment {
                        offset: start,
                        text: &sql[start..i],
                    });
                    start = i + 1;
                }
                _ => {}
            },
            Context::LineComment => {
                if b == b'\n' {
                    context = Context::Code;
                }
            }
            Context::BlockComment { depth } => {
                if b == b'*' && next == Some(b'/') {
                    context = if depth == 1 {
                        Context::Code
                    } else {
                        Context::BlockComment { depth: depth - 1 }
                    };
                    i += 2;
                    continue;
                }
                if b == b'/' && next == Some(b'*') {
                    context = Context::BlockComment { depth: depth + 1 };
                    i += 2;
                    continue;
                }
            }
            Context::Quoted {
                quote,
                backslash_escapes,
            } => {
                if backslash_escapes && b == b'\\' {
                    i += 2;
                    continue;
                }
                if b == quote {
                    // A doubled quote is an escaped quote, not the end.
                    if next == Some(quote) {
                        i += 2;
                        continue;
                    }
                    context = Context::Code;
                }
            }
            Context::DollarQuoted { delimiter } => {
                if bytes[i..].starts_with(delimiter.as_bytes()) {
                    context = Context::Code;
                    i += delimiter.len();
                    continue;
                }
            }
        }

        i += 1;
    }

    if start < sql.len() {
        fragments.push(Fragment {
            offset: start,
            text: &sql[start..],
        });
    }

    fragments
}

/// Whether `text` contains nothing but whitespace and complete comments.
///
/// An unterminated block comment is not blank.
pub fn is_blank(text: &str) -> bool {
    let mut rest = text.trim_start();
    loop {
        if rest.is_empty() {
            return true;
        }
        if let Some(comment) = rest.strip_prefix("--") {
            rest = comment.split_once('\n').map_or("", |(_, after)| after);
        } else if rest.starts_with("/*") {
            match block_comment_end(rest) {
                Some(end) => rest = &rest[end..],
                // Sent as-is so the server reports the unterminated comment.
                None => return false,
            }
        } else {
            return false;
        }
        rest = rest.trim_start();
    }
}

/// Byte index just past the block comment that opens at the start of `text`.
fn block_comment_end(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;
    while i + 1 < bytes.len() {
        match (bytes[i], bytes[i + 1]) {
            (b'/', b'*') => {
                depth += 1;
                i += 2;
            }
            (b'*', b'/') => {
                depth -= 1;
                i += 2;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => i += 1,
        }
    }
    None
}

fn is_identifier_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || !b.is_ascii()
}

/// `E'...'` strings treat backslash as an escape character.
fn is_escape_string_prefix(bytes: &[u8], quote_at: usize) -> bool {
    quote_at > 0
        && matches!(bytes[quote_at - 1], b'E' | b'e')
        && (quote_at == 1 || !is_identifier_byte(bytes[quote_at - 2]))
}

/// The `$tag$` delimiter opening at `start`, if any.
///
/// The tag is empty or an identifier that does not start with a digit, so
/// positional parameters such as `$1` never open a dollar quote.
fn dollar_quote_delimiter(sql: &str, start: usize) -> Option<&str> {
    let bytes = sql.as_bytes();
    if start > 0 && is_identifier_byte(bytes[start - 1]) {
        return None;
    }

    let tag_len = bytes[start + 1..].iter().position(|&b| b == b'$')?;
    let tag = &bytes[start + 1..start + 1 + tag_len];
    let valid = tag
        .first()
        .map_or(true, |&b| b.is_ascii_alphabetic() || b == b'_')
        && tag.iter().all(|&b| b.is_ascii_alphanumeric() || b == b'_');

    valid.then(|| &sql[start..start + tag_len + 2])
}
