use std::io::BufRead;

use crate::Error;
use crate::extract::{self, Extracted, LineError};
use crate::map::EnvMap;
use crate::scanner::Scanner;
use crate::source::{LineSource, ReaderSource};
use crate::substitute;

/// Parse dotenv text into an ordered map.
///
/// # Errors
///
/// Returns `Error::InvalidLine` when a line with `=` has an invalid
/// key. The whole input is rejected; no partial map is returned.
pub fn parse_str(input: &str) -> Result<EnvMap, Error> {
    parse_reader(input.as_bytes())
}

/// Parse dotenv text from a buffered reader.
///
/// # Errors
///
/// Returns `Error::Read` if the reader fails and `Error::InvalidLine`
/// on a line with an invalid key.
pub fn parse_reader<R: BufRead>(reader: R) -> Result<EnvMap, Error> {
    parse_source(ReaderSource::new(reader))
}

/// Parse dotenv text pulled from any [`LineSource`].
///
/// Each logical line is substituted against the entries committed
/// before it, then extracted and committed. The first invalid line or
/// read failure aborts the pass.
pub fn parse_source<S: LineSource>(source: S) -> Result<EnvMap, Error> {
    Parser::new(source).parse()
}

struct Parser<S> {
    scanner: Scanner<S>,
    expanded: String,
    env: EnvMap,
}

impl<S: LineSource> Parser<S> {
    fn new(source: S) -> Self {
        Self {
            scanner: Scanner::new(source),
            expanded: String::new(),
            env: EnvMap::new(),
        }
    }

    fn parse(mut self) -> Result<EnvMap, Error> {
        while let Some(line) = self.scanner.next_logical()? {
            self.expanded.clear();
            substitute::substitute(line.text, &self.env, &mut self.expanded);

            match extract::extract(&self.expanded) {
                Ok(Extracted::Entry(entry)) => {
                    self.env.commit(entry);
                }
                Ok(Extracted::Skip) => {}
                Err(kind) => {
                    return Err(LineError {
                        kind,
                        line: line.first_line,
                    }
                    .into());
                }
            }
        }

        Ok(self.env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_pass() {
        let env = parse_str("A=1\nB=2\n").expect("should parse");
        assert_eq!(env.len(), 2);
        assert_eq!(env.get("A"), Some("1"));
        assert_eq!(env.get("B"), Some("2"));
    }

    #[test]
    fn substitution_sees_only_prior_entries() {
        let env = parse_str("B=${A}\nA=1\nC=${A}").expect("should parse");
        assert_eq!(env.get("B"), Some(""));
        assert_eq!(env.get("C"), Some("1"));
    }

    #[test]
    fn repeated_key_last_write_wins() {
        let env = parse_str("A=1\nA=2\nB=${A}").expect("should parse");
        assert_eq!(env.get("A"), Some("2"));
        assert_eq!(env.get("B"), Some("2"));
    }

    #[test]
    fn invalid_line_reports_first_physical_line() {
        let err = parse_str("A=1\n\nB=\"x\ny\"\n9C=3\n").unwrap_err();
        match err {
            Error::InvalidLine(e) => assert_eq!(e.line, 5),
            other => panic!("unexpected error: {other}"),
        }
    }
}
