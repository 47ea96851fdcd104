// loganon/src/main.rs
//! loganon entry point.
//!
//! Parses arguments, wires Ctrl-C to the run's cancellation token, and maps
//! the outcome to an exit status: 0 on success, 1 on any error, 130 when
//! interrupted.

use clap::Parser;
use std::process::ExitCode;

use loganon::cli::Cli;
use loganon::commands::anonymize::{error_msg, install_interrupt_handler, run_anonymize, AnonymizeOptions};
use loganon::logger;
use loganon_core::CancellationToken;

const EXIT_INTERRUPTED: u8 = 130;

fn main() -> ExitCode {
    let args = Cli::parse();
    logger::init_logger(logger::level_from_flags(args.quiet, args.debug));

    let cancel = CancellationToken::new();
    if let Err(e) = install_interrupt_handler(&cancel) {
        log::warn!("{:#}", e);
    }

    let opts = AnonymizeOptions {
        config: args.config,
        input: args.input,
        output: args.output,
        quiet: args.quiet,
        threads: args.threads,
        batch_size: args.batch_size,
        progress: !args.no_progress,
    };

    match run_anonymize(&opts, cancel) {
        Ok(summary) if summary.cancelled => ExitCode::from(EXIT_INTERRUPTED),
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error_msg(format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
