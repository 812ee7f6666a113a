//! Dotenv parser with quote-aware multiline values and `${VAR}`
//! substitution.
//!
//! Parses `KEY=VALUE` files with `export` prefixes, comments, single
//! and double quoting, backslash escapes, values spanning several
//! lines, and `${NAME}` references to variables defined earlier in the
//! same file. The result is an ordered map that can be applied to the
//! process environment or any other [`EnvStore`].
//!
//! # Quick start
//!
//! ## Parse text into a map
//!
//! ```
//! use dotenv_rs::parse_str;
//!
//! let input = "HOST=localhost\nexport PORT='5432'\nURL=\"pg://${HOST}:${PORT}\"\n";
//! let env = parse_str(input).unwrap();
//! assert_eq!(env.get("URL"), Some("pg://localhost:5432"));
//! ```
//!
//! ## Load files into a store
//!
//! ```
//! use std::collections::HashMap;
//! use dotenv_rs::Loader;
//!
//! let mut store: HashMap<String, String> = HashMap::new();
//! let result = Loader::new()
//!     .path("does-not-exist.env")
//!     .load_into(&mut store);
//! assert!(result.is_err());
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod extract;
pub mod formatter;
pub mod loader;
pub mod map;
pub mod parser;
pub mod scanner;
pub mod source;
pub mod substitute;

use std::io;
use std::path::PathBuf;

pub use extract::{Extracted, LineError, LineErrorKind, extract};
pub use formatter::format;
pub use loader::{
    DEFAULT_PATH, EnvStore, Loader, ProcessEnv, apply, load, load_reader, overload, read_file,
};
pub use map::{EnvMap, Entry};
pub use parser::{parse_reader, parse_source, parse_str};
pub use scanner::{LogicalLine, ReadError, Scanner};
pub use source::{LineSource, ReaderSource};

/// Unified error type for parsing and loading.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A line with `=` had an invalid key.
    #[error("{0}")]
    InvalidLine(#[from] LineError),
    /// The line source failed.
    #[error("{0}")]
    Read(#[from] ReadError),
    /// An env file could not be opened.
    #[error("failed to open {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },
}
