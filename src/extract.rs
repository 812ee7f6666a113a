use std::fmt;

use crate::map::Entry;

/// Classifies why a line was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineErrorKind {
    /// Nothing before the `=` (e.g. `=value`).
    EmptyKey,
    /// Key is not an identifier (letters, digits, `_`; no leading digit).
    InvalidKey(String),
}

impl fmt::Display for LineErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyKey => write!(f, "missing key before '='"),
            Self::InvalidKey(key) => write!(f, "invalid key '{key}'"),
        }
    }
}

/// Error produced for a syntactically invalid line. Aborts the pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {line}")]
pub struct LineError {
    pub kind: LineErrorKind,
    /// First physical line of the offending record (1-based).
    pub line: usize,
}

/// Outcome of extracting a logical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted {
    /// An assignment to commit.
    Entry(Entry),
    /// Blank line, comment, or a line without `=`.
    Skip,
}

/// Split a (substituted) logical line into key and value.
///
/// Blank lines, `#` comments, and lines without any `=` are skipped.
/// An optional leading `export` is dropped. Double-quoted values have
/// their escapes decoded, single-quoted values are taken verbatim, and
/// unquoted values lose a trailing ` # comment`.
///
/// # Errors
///
/// Returns the error kind when a `=` is present but the key before it
/// is empty or not an identifier.
pub fn extract(line: &str) -> Result<Extracted, LineErrorKind> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(Extracted::Skip);
    }

    let line = strip_export(line);
    let Some((key, raw)) = line.split_once('=') else {
        return Ok(Extracted::Skip);
    };

    let key = key.trim();
    validate_key(key)?;

    Ok(Extracted::Entry(Entry {
        key: key.to_string(),
        value: parse_value(raw),
    }))
}

/// Whether `key` is accepted as a variable name.
#[must_use]
pub fn is_valid_key(key: &str) -> bool {
    let mut chars = key.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn validate_key(key: &str) -> Result<(), LineErrorKind> {
    if key.is_empty() {
        Err(LineErrorKind::EmptyKey)
    } else if is_valid_key(key) {
        Ok(())
    } else {
        Err(LineErrorKind::InvalidKey(key.to_string()))
    }
}

/// Drop a leading `export` unless it is itself the key (`export = 1`).
fn strip_export(line: &str) -> &str {
    match line.strip_prefix("export") {
        Some(rest)
            if rest.starts_with(char::is_whitespace) && !rest.trim_start().starts_with('=') =>
        {
            rest.trim_start()
        }
        _ => line,
    }
}

fn parse_value(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.chars().next() {
        Some(quote @ ('\'' | '"')) => {
            quoted_value(trimmed, quote).unwrap_or_else(|| unquoted_value(raw))
        }
        _ => unquoted_value(raw),
    }
}

fn unquoted_value(raw: &str) -> String {
    strip_comment(raw).trim().to_string()
}

/// Decode a value starting with `quote`.
///
/// Accepts a closing mark followed by nothing or a comment; otherwise
/// falls back to stripping an outer pair of matching marks. Returns
/// `None` when the value is not quoted after all.
fn quoted_value(trimmed: &str, quote: char) -> Option<String> {
    let body = &trimmed[quote.len_utf8()..];

    let inner = match find_closing(body, quote) {
        Some(close) if is_blank_or_comment(&body[close + 1..]) => &body[..close],
        _ if body.ends_with(quote) => &body[..body.len() - quote.len_utf8()],
        _ => return None,
    };

    Some(if quote == '"' {
        unescape(inner)
    } else {
        inner.to_string()
    })
}

fn find_closing(body: &str, quote: char) -> Option<usize> {
    let mut escaped = false;
    for (i, ch) in body.char_indices() {
        if escaped {
            escaped = false;
        } else if ch == '\\' && quote == '"' {
            escaped = true;
        } else if ch == quote {
            return Some(i);
        }
    }
    None
}

fn is_blank_or_comment(rest: &str) -> bool {
    let rest = rest.trim_start();
    rest.is_empty() || rest.starts_with('#')
}

fn strip_comment(raw: &str) -> &str {
    let mut after_space = false;
    for (i, ch) in raw.char_indices() {
        if ch == '#' && after_space {
            return &raw[..i];
        }
        after_space = ch.is_whitespace();
    }
    raw
}

fn unescape(inner: &str) -> String {
    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            value.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => value.push('\n'),
            Some('r') => value.push('\r'),
            Some('t') => value.push('\t'),
            // covers \" \\ \$ and drops the backslash of unknown escapes
            Some(c) => value.push(c),
            None => value.push('\\'),
        }
    }
    value
}
