// loganon/src/commands/anonymize.rs
//! The anonymize command: load rules, stream the input file through the
//! line processor, and write the result to a file or stdout.

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::{debug, info};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;

use loganon_core::{
    AnonymizationEngine, CancellationToken, LineProcessor, RegexEngine, RuleSet, RunSummary,
};

use crate::ui::output_format;
use crate::ui::progress::{ProgressWriter, PROGRESS_INTERVAL};
use crate::utils::input::read_lines;

/// Options for a single anonymization run.
#[derive(Debug, Clone)]
pub struct AnonymizeOptions {
    pub config: PathBuf,
    pub input: PathBuf,
    /// Stdout when `None`.
    pub output: Option<PathBuf>,
    pub quiet: bool,
    /// Worker threads; rayon's global pool when `None`.
    pub threads: Option<usize>,
    pub batch_size: usize,
    pub progress: bool,
}

/// Helper for printing info messages to stderr.
pub fn info_msg(msg: impl AsRef<str>, quiet: bool) {
    if quiet {
        return;
    }
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_info_message(&mut io::stderr(), msg.as_ref(), stderr_supports_color);
}

/// Helper for printing warning messages to stderr. Shown even when quiet.
pub fn warn_msg(msg: impl AsRef<str>) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_warn_message(&mut io::stderr(), msg.as_ref(), stderr_supports_color);
}

/// Helper for printing error messages to stderr.
pub fn error_msg(msg: impl AsRef<str>) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_error_message(&mut io::stderr(), msg.as_ref(), stderr_supports_color);
}

fn success_msg(msg: impl AsRef<str>, quiet: bool) {
    if quiet {
        return;
    }
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_success_message(&mut io::stderr(), msg.as_ref(), stderr_supports_color);
}

/// Routes Ctrl-C to `cancel`. Can be installed once per process.
pub fn install_interrupt_handler(cancel: &CancellationToken) -> Result<()> {
    let token = cancel.clone();
    ctrlc::set_handler(move || token.cancel()).context("Failed to install Ctrl-C handler")
}

/// One-line description of a finished run.
pub fn format_summary(summary: &RunSummary) -> String {
    format!(
        "Processed {} lines: {} literal and {} pattern replacements, {} distinct values, {} lines passed through unchanged.",
        summary.lines_processed,
        summary.literal_replacements,
        summary.pattern_replacements,
        summary.distinct_values,
        summary.lines_passed_through
    )
}

/// Runs one anonymization pass as described by `opts`.
///
/// Every configuration problem is reported before the input is opened. On
/// cancellation the output produced so far is flushed and the returned
/// summary has `cancelled` set.
pub fn run_anonymize(opts: &AnonymizeOptions, cancel: CancellationToken) -> Result<RunSummary> {
    info!("Starting anonymize operation.");

    info_msg(format!("Using config: {}", opts.config.display()), opts.quiet);
    let rules = RuleSet::load_from_file(&opts.config)?;
    let engine = RegexEngine::new(&rules)
        .with_context(|| format!("Invalid rules in {}", opts.config.display()))?;
    debug!(
        "Compiled {} literal and {} pattern rules.",
        engine.compiled_rules().literal_count(),
        engine.compiled_rules().pattern_count()
    );

    info_msg(format!("Reading from: {}", opts.input.display()), opts.quiet);
    let input = File::open(&opts.input)
        .with_context(|| format!("Failed to open input file: {}", opts.input.display()))?;
    let reader = BufReader::new(input);

    let output: Box<dyn Write + Send> = match &opts.output {
        Some(path) => {
            info_msg(format!("Outputting to: {}", path.display()), opts.quiet);
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout())),
    };
    let show_progress = opts.progress && !opts.quiet;
    let mut sink: Box<dyn Write + Send> = if show_progress {
        Box::new(ProgressWriter::new(output, io::stderr()))
    } else {
        output
    };

    let processor = LineProcessor::new(&engine)
        .with_batch_size(opts.batch_size)
        .with_cancellation(cancel);

    let summary = match opts.threads {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .context("Failed to build worker thread pool")?;
            debug!("Using a dedicated pool of {} worker threads.", pool.current_num_threads());
            pool.install(|| processor.run(read_lines(reader), &mut sink))
        }
        None => processor.run(read_lines(reader), &mut sink),
    }
    .with_context(|| format!("Failed to anonymize {}", opts.input.display()))?;
    drop(sink);

    // Terminate the row of progress dots before the closing messages.
    if show_progress && summary.lines_processed >= PROGRESS_INTERVAL {
        eprintln!();
    }

    if summary.cancelled {
        warn_msg(format!(
            "Interrupted: output is incomplete ({} lines written).",
            summary.lines_processed
        ));
    }
    info_msg(format_summary(&summary), opts.quiet);
    if !summary.cancelled {
        success_msg("Done.", opts.quiet);
    }

    info!("Anonymize operation completed.");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn options(dir: &std::path::Path, rules: &str, input: &str) -> AnonymizeOptions {
        let config = dir.join("LogAnonymizer.yaml");
        let input_path = dir.join("in.log");
        fs::write(&config, rules).unwrap();
        fs::write(&input_path, input).unwrap();
        AnonymizeOptions {
            config,
            input: input_path,
            output: Some(dir.join("out.log")),
            quiet: true,
            threads: Some(2),
            batch_size: 2,
            progress: false,
        }
    }

    #[test_log::test]
    fn test_run_writes_anonymized_file() -> Result<()> {
        let dir = tempdir()?;
        let opts = options(
            dir.path(),
            "SECRET_KEY: REDACTED\n",
            "key is SECRET_KEY here\nplain\nSECRET_KEY\n",
        );
        let summary = run_anonymize(&opts, CancellationToken::new())?;

        let out = fs::read_to_string(dir.path().join("out.log"))?;
        assert_eq!(out, "key is REDACTED here\nplain\nREDACTED\n");
        assert_eq!(summary.lines_processed, 3);
        assert_eq!(summary.literal_replacements, 2);
        assert!(!summary.cancelled);
        Ok(())
    }

    #[test_log::test]
    fn test_cancelled_run_writes_nothing() -> Result<()> {
        let dir = tempdir()?;
        let opts = options(dir.path(), "SECRET_KEY: REDACTED\n", "a\nb\nc\n");
        let cancel = CancellationToken::new();
        cancel.cancel();
        let summary = run_anonymize(&opts, cancel)?;

        assert!(summary.cancelled);
        assert_eq!(summary.lines_processed, 0);
        assert_eq!(fs::read_to_string(dir.path().join("out.log"))?, "");
        Ok(())
    }

    #[test_log::test]
    fn test_bad_rules_fail_before_output_is_created() {
        let dir = tempdir().unwrap();
        let opts = options(dir.path(), "'id=(\\d+': 'id=$randnum'\n", "id=1\n");
        let err = run_anonymize(&opts, CancellationToken::new()).unwrap_err();

        assert!(format!("{:#}", err).contains("id=(\\d+"));
        assert!(!dir.path().join("out.log").exists());
    }

    #[test_log::test]
    fn test_missing_input_is_reported() {
        let dir = tempdir().unwrap();
        let mut opts = options(dir.path(), "A: B\n", "");
        opts.input = dir.path().join("missing.log");
        let err = run_anonymize(&opts, CancellationToken::new()).unwrap_err();
        assert!(format!("{:#}", err).contains("missing.log"));
    }

    #[test_log::test]
    fn test_format_summary() {
        let summary = RunSummary {
            lines_processed: 10,
            lines_passed_through: 1,
            literal_replacements: 2,
            pattern_replacements: 3,
            distinct_values: 3,
            cancelled: false,
        };
        assert_eq!(
            format_summary(&summary),
            "Processed 10 lines: 2 literal and 3 pattern replacements, 3 distinct values, 1 lines passed through unchanged."
        );
    }
}
