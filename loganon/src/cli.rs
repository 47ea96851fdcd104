//! This file defines the command-line interface (CLI) for the loganon
//! application.
//! License: MIT OR Apache-2.0

use clap::Parser;
use std::path::PathBuf;

/// Config file used when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "LogAnonymizer.yaml";

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "loganon",
    author = "LogZilla",
    version = env!("CARGO_PKG_VERSION"),
    about = "Anonymize log files with consistent synthetic replacements",
    long_about = "loganon replaces sensitive values in log files according to a YAML rule mapping. Literal keys are replaced verbatim; keys containing a backslash are regular expressions whose replacement templates may use $randstr, $randnum, $randip, $randhost and $randemail. Every distinct original value receives the same replacement for the whole run.",
    after_help = "Example:\n  loganon --config LogAnonymizer.yaml --input private.log -o anon.log",
)]
pub struct Cli {
    /// Path to the rule mapping (YAML).
    #[arg(long, short = 'c', value_name = "FILE", default_value = DEFAULT_CONFIG_FILE, help = "Config filename.")]
    pub config: PathBuf,

    /// Path to the log file to anonymize.
    #[arg(long, short = 'i', value_name = "FILE", help = "Input filename.")]
    pub input: PathBuf,

    /// Write anonymized output to this file instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE", help = "Output filename. If omitted, output goes to stdout.")]
    pub output: Option<PathBuf>,

    /// Disable informational messages
    #[arg(long, short = 'q', help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG to DEBUG)
    #[arg(long, short = 'd', conflicts_with = "quiet", help = "Enable debug logging.")]
    pub debug: bool,

    /// Number of worker threads (defaults to one per CPU).
    #[arg(long, value_name = "N", env = "LOGANON_THREADS", help = "Number of worker threads.")]
    pub threads: Option<usize>,

    /// Lines processed per parallel batch.
    #[arg(long = "batch-size", value_name = "N", default_value_t = loganon_core::BATCH_SIZE, help = "Lines processed per parallel batch.")]
    pub batch_size: usize,

    /// Do not print progress dots.
    #[arg(long = "no-progress", help = "Do not print a progress dot every 100000 lines.")]
    pub no_progress: bool,
}
