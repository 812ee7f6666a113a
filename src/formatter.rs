//! Serializes an `EnvMap` back into dotenv text.
//!
//! Output parses back to the same map: values that are not plain
//! words are double-quoted with escapes, and `$` is escaped so no
//! substitution happens on re-read.

use crate::map::EnvMap;

/// Format an `EnvMap` as one `KEY=value` line per entry.
///
/// Entries keep their map order. Keys are written as is, so a map
/// built by hand with non-identifier keys will not parse back.
#[must_use]
pub fn format(env: &EnvMap) -> String {
    let mut out = String::new();
    for (key, value) in env.iter() {
        format_entry(&mut out, key, value);
    }
    out
}

fn format_entry(out: &mut String, key: &str, value: &str) {
    out.push_str(key);
    out.push('=');

    if is_bare(value) {
        out.push_str(value);
    } else {
        out.push('"');
        escape_into(out, value);
        out.push('"');
    }

    out.push('\n');
}

/// Punctuation that never needs quoting in a value.
const BARE_PUNCTUATION: &str = "-_./:,@%+=~?&";

fn is_bare(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || BARE_PUNCTUATION.contains(c))
}

fn escape_into(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '$' => out.push_str("\\$"),
            c => out.push(c),
        }
    }
}
