#![allow(dead_code)]

use std::path::PathBuf;

use dotenv_rs::{EnvMap, read_file};

/// Absolute path of a file under `tests/fixtures`.
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn read_fixture(name: &str) -> EnvMap {
    read_file(fixture(name)).unwrap_or_else(|e| panic!("failed to read fixture {name}: {e}"))
}

/// Assert every expected key is present with the expected value.
pub fn assert_values(env: &EnvMap, expected: &[(&str, &str)]) {
    for (key, value) in expected {
        assert_eq!(
            env.get(key),
            Some(*value),
            "mismatch for key '{key}'\n--- map ---\n{env:?}"
        );
    }
}
