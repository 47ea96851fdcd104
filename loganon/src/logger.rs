// loganon/src/logger.rs
//! Logger setup for the loganon binary.
//!
//! `RUST_LOG` is honoured unless an explicit level is passed in, in which case
//! the explicit level wins. Records go to stderr so they never mix with
//! anonymized output on stdout.

use env_logger::{Builder, Env, Target};
use log::LevelFilter;

/// Initializes `env_logger` once. Later calls are ignored.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    builder.target(Target::Stderr).format_timestamp(None);
    if let Some(level) = level {
        builder.filter_level(level);
    }
    // A logger may already be installed (tests, embedding); that is fine.
    let _ = builder.try_init();
}

/// Level implied by the `--quiet` / `--debug` flags.
pub fn level_from_flags(quiet: bool, debug: bool) -> Option<LevelFilter> {
    if quiet {
        Some(LevelFilter::Off)
    } else if debug {
        Some(LevelFilter::Debug)
    } else {
        None
    }
}
