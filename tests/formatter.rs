//! Formatter-specific tests.

use dotenv_rs::{EnvMap, format, parse_str};

#[test]
fn format_one_line_per_entry() {
    let env = parse_str("A=1\nB=2\n").unwrap();
    assert_eq!(format(&env), "A=1\nB=2\n");
}

#[test]
fn format_drops_comments_and_export() {
    let env = parse_str("# header\nexport A=1 # note\n\nB='two words'\n").unwrap();
    assert_eq!(format(&env), "A=1\nB=\"two words\"\n");
}

#[test]
fn format_keeps_definition_order() {
    let env = parse_str("Z=1\nA=2\nZ=3\n").unwrap();
    assert_eq!(format(&env), "Z=3\nA=2\n");
}

#[test]
fn format_multiline_value_on_one_line() {
    let env = parse_str("A=\"one\ntwo\"\n").unwrap();
    assert_eq!(format(&env), "A=\"one\\ntwo\"\n");
}

#[test]
fn format_output_reparses() {
    let env: EnvMap = [
        ("PLAIN", "value"),
        ("SPACES", "  padded  "),
        ("HASH", "a # b"),
        ("QUOTES", "'single' \"double\""),
        ("BACKSLASH", "C:\\path\\n"),
        ("DOLLAR", "${PLAIN}"),
        ("CONTROL", "tab\there\r\nnext"),
        ("EMPTY", ""),
    ]
    .into_iter()
    .collect();

    let formatted = format(&env);
    let parsed = parse_str(&formatted).unwrap_or_else(|e| {
        panic!("failed to re-parse formatted output: {e}\n--- formatted ---\n{formatted}")
    });
    assert_eq!(env, parsed, "--- formatted ---\n{formatted}");
}

#[test]
fn format_is_idempotent() {
    let input = "A=1\nB=\"x y\"\nC=\"\\$HOME\"\n";
    let once = format(&parse_str(input).unwrap());
    let twice = format(&parse_str(&once).unwrap());
    assert_eq!(once, input);
    assert_eq!(once, twice);
}
