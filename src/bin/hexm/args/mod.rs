//! Command line front end.
//!
//! Order of work:
//! 1. Split FILE arguments into inputs and output
//! 2. Parse every `path[:address]` directive
//! 3. Check inputs exist; confirm overwriting an existing output
//! 4. Load and merge inputs in order, prompting on overlaps
//! 5. Write the output as Intel HEX or rebased binary

mod error;
mod execute;
mod types;

use std::process::ExitCode;

use clap::Parser;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub use types::Args;

pub fn run() -> ExitCode {
    let args = Args::parse();

    // RUST_LOG directives are read first; --verbose raises the floor to DEBUG.
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::from_default_env().add_directive(level.into());
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match args.execute() {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) if e.is_declined() => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
