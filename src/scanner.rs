use std::io;

use crate::source::LineSource;

/// Error produced when the line source fails during a pass.
#[derive(Debug, thiserror::Error)]
#[error("failed to read line {line}: {source}")]
pub struct ReadError {
    /// Physical line that could not be read (1-based).
    pub line: usize,
    pub source: io::Error,
}

/// One quote-balanced record assembled from one or more physical lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicalLine<'a> {
    /// Record text; stitched physical lines are joined with `\n`.
    pub text: &'a str,
    /// First physical line of the record (1-based).
    pub first_line: usize,
    /// Last physical line of the record (1-based).
    pub last_line: usize,
}

/// Where the cursor is within the record being scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Before the first `=`.
    Key,
    /// After the first `=`, outside any quoted span.
    Value,
    /// Inside a quoted span opened by the given mark.
    Quoted(char),
}

/// Per-record scanning state. Created fresh for every logical line.
#[derive(Debug)]
struct Cursor {
    state: ScanState,
    escaped: bool,
}

impl Cursor {
    const fn new() -> Self {
        Self {
            state: ScanState::Key,
            escaped: false,
        }
    }

    const fn in_quote(&self) -> bool {
        matches!(self.state, ScanState::Quoted(_))
    }

    fn scan(&mut self, line: &str, buf: &mut String) {
        for ch in line.chars() {
            buf.push(ch);
            self.step(ch);
        }
    }

    /// `=` and `#` outside a quoted span are plain text here; comments
    /// are resolved by the extractor.
    const fn step(&mut self, ch: char) {
        self.state = match self.state {
            ScanState::Key if ch == '=' => ScanState::Value,
            ScanState::Value if ch == '\'' || ch == '"' => ScanState::Quoted(ch),
            ScanState::Quoted(quote) => {
                if self.escaped {
                    self.escaped = false;
                    ScanState::Quoted(quote)
                } else if ch == '\\' {
                    self.escaped = true;
                    ScanState::Quoted(quote)
                } else if ch == quote {
                    ScanState::Value
                } else {
                    ScanState::Quoted(quote)
                }
            }
            state => state,
        };
    }

    /// Join the next physical line onto an open quoted span.
    fn line_break(&mut self, buf: &mut String) {
        buf.push('\n');
        // a trailing backslash escapes the line break itself
        self.escaped = false;
    }
}

/// Quote-aware continuation scanner.
///
/// Pulls physical lines from a [`LineSource`] and yields logical
/// lines. A quote opened after the first `=` keeps the record open
/// across physical lines until its matching mark; if the source runs
/// out first, whatever was accumulated is returned as is.
///
/// Quote marks and escapes are passed through untouched; decoding is
/// left to the extractor.
#[derive(Debug)]
pub struct Scanner<S> {
    source: S,
    buf: String,
    line: usize,
}

impl<S: LineSource> Scanner<S> {
    pub const fn new(source: S) -> Self {
        Self {
            source,
            buf: String::new(),
            line: 0,
        }
    }

    /// Assemble the next logical line, or `None` once the source is
    /// exhausted.
    pub fn next_logical(&mut self) -> Result<Option<LogicalLine<'_>>, ReadError> {
        self.buf.clear();
        let Some(mut physical) = self.pull()? else {
            return Ok(None);
        };
        let first_line = self.line;

        let mut cursor = Cursor::new();
        loop {
            cursor.scan(&physical, &mut self.buf);
            if !cursor.in_quote() {
                break;
            }
            match self.pull()? {
                Some(next) => {
                    cursor.line_break(&mut self.buf);
                    physical = next;
                }
                None => break,
            }
        }

        Ok(Some(LogicalLine {
            text: &self.buf,
            first_line,
            last_line: self.line,
        }))
    }

    fn pull(&mut self) -> Result<Option<String>, ReadError> {
        let line = self.source.next_line().map_err(|source| ReadError {
            line: self.line + 1,
            source,
        })?;
        if line.is_some() {
            self.line += 1;
        }
        Ok(line)
    }
}
