//! Loading env files into an environment store.
//!
//! A [`Loader`] reads each configured path in turn. A path that fails
//! to open or parse is logged and skipped; loading succeeds as long as
//! one path was applied. Values are written with "set only if absent"
//! unless overload mode is on.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::Error;
use crate::map::EnvMap;
use crate::parser;

/// Path loaded when no path is configured.
pub const DEFAULT_PATH: &str = ".env";

/// Key/value store parsed variables are applied to.
pub trait EnvStore {
    fn get(&self, key: &str) -> Option<String>;
    /// Store `value` under `key`. Returns `false` if the store refused
    /// the pair.
    fn set(&mut self, key: &str, value: &str) -> bool;
}

/// The environment of the current process.
///
/// Writing the process environment is only sound while no other
/// thread reads or writes it; load env files at startup.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvStore for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var_os(key).map(|v| v.to_string_lossy().into_owned())
    }

    fn set(&mut self, key: &str, value: &str) -> bool {
        if key.is_empty() || key.contains(['=', '\0']) {
            tracing::warn!(key, "key is not a valid variable name, not exported");
            return false;
        }
        if value.contains('\0') {
            tracing::warn!(key, "value contains a NUL byte, not exported");
            return false;
        }
        // SAFETY: callers load env files before spawning threads, see
        // the type-level docs.
        unsafe { std::env::set_var(key, value) }
        true
    }
}

impl EnvStore for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> bool {
        self.insert(key.to_string(), value.to_string());
        true
    }
}

/// Read and parse one env file.
///
/// # Errors
///
/// Returns `Error::Open` if the file cannot be opened, otherwise any
/// parse error for its contents.
pub fn read_file(path: impl AsRef<Path>) -> Result<EnvMap, Error> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })?;
    parser::parse_reader(BufReader::new(file))
}

/// Write `env` into `store`, returning how many keys were written.
///
/// Keys already present in `store` are left alone unless `overload`
/// is set. Pairs the store refuses are not counted.
pub fn apply<E: EnvStore + ?Sized>(env: &EnvMap, store: &mut E, overload: bool) -> usize {
    let mut written = 0;
    for (key, value) in env.iter() {
        if !overload && store.get(key).is_some() {
            continue;
        }
        if store.set(key, value) {
            written += 1;
        }
    }
    written
}

/// Parse `reader` and apply the result to `store`.
///
/// # Errors
///
/// Returns the parse error; nothing is applied in that case.
pub fn load_reader<R: BufRead, E: EnvStore + ?Sized>(
    reader: R,
    store: &mut E,
    overload: bool,
) -> Result<usize, Error> {
    let env = parser::parse_reader(reader)?;
    Ok(apply(&env, store, overload))
}

/// Load `.env` into the process environment without overwriting.
///
/// # Errors
///
/// See [`Loader::load_into`].
pub fn load() -> Result<usize, Error> {
    Loader::new().load()
}

/// Load `.env` into the process environment, overwriting set keys.
///
/// # Errors
///
/// See [`Loader::load_into`].
pub fn overload() -> Result<usize, Error> {
    Loader::new().overload(true).load()
}

/// Configures which env files are loaded and how.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Loader {
    paths: Vec<PathBuf>,
    overload: bool,
}

impl Loader {
    /// Create a loader for [`DEFAULT_PATH`] without overload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a path to load.
    #[must_use]
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.paths.push(path.into());
        self
    }

    /// Add several paths to load, in order.
    #[must_use]
    pub fn paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.paths.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Overwrite keys that are already set.
    #[must_use]
    pub const fn overload(mut self, overload: bool) -> Self {
        self.overload = overload;
        self
    }

    /// Paths this loader will read, falling back to [`DEFAULT_PATH`].
    #[must_use]
    pub fn configured_paths(&self) -> Vec<&Path> {
        if self.paths.is_empty() {
            vec![Path::new(DEFAULT_PATH)]
        } else {
            self.paths.iter().map(PathBuf::as_path).collect()
        }
    }

    /// Load into the process environment.
    ///
    /// # Errors
    ///
    /// See [`Loader::load_into`].
    pub fn load(&self) -> Result<usize, Error> {
        self.load_into(&mut ProcessEnv)
    }

    /// Load every configured path into `store`.
    ///
    /// Paths are processed in order, each parsed on its own. Returns
    /// the total number of keys written.
    ///
    /// # Errors
    ///
    /// Returns the last path's error if no path could be loaded.
    pub fn load_into<E: EnvStore + ?Sized>(&self, store: &mut E) -> Result<usize, Error> {
        let mut written = 0;
        let mut loaded = 0;
        let mut last_error = None;

        for path in self.configured_paths() {
            match read_file(path) {
                Ok(env) => {
                    let applied = apply(&env, store, self.overload);
                    tracing::debug!(
                        path = %path.display(),
                        parsed = env.len(),
                        applied,
                        "loaded env file"
                    );
                    written += applied;
                    loaded += 1;
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping env file");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if loaded == 0 => Err(e),
            _ => Ok(written),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path() {
        assert_eq!(Loader::new().configured_paths(), vec![Path::new(".env")]);
    }

    #[test]
    fn configured_paths_in_order() {
        let loader = Loader::new().path("a.env").paths(["b.env", "c.env"]);
        assert_eq!(
            loader.configured_paths(),
            vec![Path::new("a.env"), Path::new("b.env"), Path::new("c.env")]
        );
    }

    #[test]
    fn apply_respects_existing_keys() {
        let env: EnvMap = [("A", "1"), ("B", "2")].into_iter().collect();
        let mut store = HashMap::from([("A".to_string(), "keep".to_string())]);

        assert_eq!(apply(&env, &mut store, false), 1);
        assert_eq!(store["A"], "keep");
        assert_eq!(store["B"], "2");
    }

    #[test]
    fn apply_overload_overwrites() {
        let env: EnvMap = [("A", "1")].into_iter().collect();
        let mut store = HashMap::from([("A".to_string(), "old".to_string())]);

        assert_eq!(apply(&env, &mut store, true), 1);
        assert_eq!(store["A"], "1");
    }

    #[test]
    fn empty_preset_counts_as_set() {
        let env: EnvMap = [("A", "1")].into_iter().collect();
        let mut store = HashMap::from([("A".to_string(), String::new())]);

        assert_eq!(apply(&env, &mut store, false), 0);
        assert_eq!(store["A"], "");
    }

    #[test]
    fn process_env_refuses_unusable_pairs() {
        let mut env = EnvMap::new();
        env.insert("", "empty");
        env.insert("DOTENV_RS_UNIT=KEY", "v");
        env.insert("DOTENV_RS_UNIT\0KEY", "v");
        env.insert("DOTENV_RS_UNIT_NUL_VALUE", "a\0b");

        assert_eq!(apply(&env, &mut ProcessEnv, true), 0);
        assert!(std::env::var_os("DOTENV_RS_UNIT_NUL_VALUE").is_none());
    }

    #[test]
    fn load_reader_into_map() {
        let mut store: HashMap<String, String> = HashMap::new();
        let written = load_reader("A=1\nB=${A}".as_bytes(), &mut store, false).expect("load");
        assert_eq!(written, 2);
        assert_eq!(store["B"], "1");
    }

    #[test]
    fn load_reader_error_applies_nothing() {
        let mut store: HashMap<String, String> = HashMap::new();
        assert!(load_reader("A=1\n1B=2".as_bytes(), &mut store, false).is_err());
        assert!(store.is_empty());
    }
}
