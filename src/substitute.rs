//! `${NAME}` substitution against the variables committed so far.
//!
//! Runs once over the whole logical line, before it is split into key
//! and value. Replacement text is never rescanned, so a value holding
//! `${OTHER}` is not expanded again.

use crate::map::EnvMap;

/// Replace every `${NAME}` in `line` with its value from `env`,
/// appending the result to `out`.
///
/// Unknown names expand to the empty string. A `${` without a closing
/// `}` is kept as literal text, and a backslash shields the character
/// after it, so `\${NAME}` is left alone.
pub fn substitute(line: &str, env: &EnvMap, out: &mut String) {
    let mut rest = line;

    while let Some(pos) = rest.find(['\\', '$']) {
        let (head, tail) = rest.split_at(pos);
        out.push_str(head);

        if let Some(escaped) = tail.strip_prefix('\\') {
            let len = 1 + escaped.chars().next().map_or(0, char::len_utf8);
            out.push_str(&tail[..len]);
            rest = &tail[len..];
        } else if let Some(after) = tail.strip_prefix("${") {
            let Some(end) = after.find('}') else {
                // unterminated placeholder, nothing left to expand
                out.push_str(tail);
                return;
            };
            out.push_str(env.get(&after[..end]).unwrap_or_default());
            rest = &after[end + 1..];
        } else {
            out.push('$');
            rest = &tail[1..];
        }
    }

    out.push_str(rest);
}
