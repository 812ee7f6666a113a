//! CLI tool to validate and format dotenv files.

use std::fs;
use std::process::ExitCode;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        eprintln!("Usage: dotenv <command> [files...]");
        eprintln!();
        eprintln!("Commands:");
        eprintln!("  validate  Check if env file(s) parse");
        eprintln!("  fmt       Print env file(s) in canonical form");
        eprintln!("  check     Check if env file(s) are in canonical form");
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  dotenv validate .env");
        eprintln!("  dotenv fmt .env.example");
        eprintln!("  RUST_LOG=debug dotenv check .env");
        return ExitCode::from(2);
    }

    let command = args[1].as_str();
    let files = &args[2..];

    if !matches!(command, "validate" | "fmt" | "check") {
        eprintln!("Unknown command: {command}");
        return ExitCode::from(2);
    }

    if files.is_empty() {
        eprintln!("Error: no files specified");
        return ExitCode::from(2);
    }

    let mut had_error = false;

    for path in files {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{path}: {e}");
                had_error = true;
                continue;
            }
        };

        let env = match dotenv_rs::parse_str(&content) {
            Ok(env) => env,
            Err(e) => {
                eprintln!("{path}: {e}");
                had_error = true;
                continue;
            }
        };
        tracing::debug!(path = %path, variables = env.len(), "parsed");

        match command {
            "validate" => {
                eprintln!("{path}: valid ({} variable(s))", env.len());
            }
            "fmt" => {
                print!("{}", dotenv_rs::format(&env));
            }
            _ => {
                if dotenv_rs::format(&env) == content {
                    eprintln!("{path}: formatted");
                } else {
                    eprintln!("{path}: not formatted");
                    had_error = true;
                }
            }
        }
    }

    if had_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
