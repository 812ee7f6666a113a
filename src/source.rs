//! Physical line sources feeding the scanner.

use std::io::{self, BufRead};

/// Pull-based supplier of physical lines.
///
/// The scanner may call [`next_line`](Self::next_line) again in the
/// middle of a record when a quoted value spans several lines.
pub trait LineSource {
    /// Return the next physical line without its terminator.
    ///
    /// `Ok(None)` signals clean exhaustion, `Err` a read failure.
    fn next_line(&mut self) -> io::Result<Option<String>>;
}

/// Line source over any buffered reader.
///
/// Strips `\n` and `\r\n` terminators and a leading UTF-8 BOM.
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
    first: bool,
}

impl<R: BufRead> ReaderSource<R> {
    pub const fn new(reader: R) -> Self {
        Self {
            reader,
            first: true,
        }
    }
}

impl<R: BufRead> LineSource for ReaderSource<R> {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }

        if self.first {
            self.first = false;
            if let Some(rest) = line.strip_prefix('\u{FEFF}') {
                line = rest.to_string();
            }
        }

        Ok(Some(line))
    }
}
