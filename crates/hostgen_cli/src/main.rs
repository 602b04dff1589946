//! hostgen command line
//!
//! ```text
//! hostgen generate [--config <path>]   Render every configured target
//! hostgen print [--config <path>]      Dump parsed modules and shared types
//! ```
//!
//! Logging is controlled with `HOSTGEN_LOG` (default `info`).

mod commands;

use anyhow::{bail, Result};
use std::env;

fn main() -> Result<()> {
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("generate") => commands::generate(&args[1..]),
        Some("print") => commands::print(&args[1..]),
        Some("help") | Some("--help") | Some("-h") | None => {
            print_usage();
            Ok(())
        }
        Some(other) => {
            print_usage();
            bail!("Unknown command: {}", other)
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_env("HOSTGEN_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

fn print_usage() {
    println!("hostgen - generate host-module bindings");
    println!();
    println!("USAGE:");
    println!("    hostgen <COMMAND> [--config <path>]");
    println!();
    println!("COMMANDS:");
    println!("    generate    Render modules and named types of every target");
    println!("    print       Print parsed modules and shared types");
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <path>    Config file (default: hostgen.toml)");
}
