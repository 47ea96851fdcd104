// loganon-core/src/processor.rs
//! The line processor: feeds lines from a source through an engine and hands
//! the results to a sink.
//!
//! Lines are taken from the source in batches. Each batch is anonymized in
//! parallel on the rayon pool and written to the sink in input order before
//! the next batch is read, so memory stays bounded by the batch size and the
//! output order always matches the input order.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, info, warn};
use rayon::prelude::*;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::engine::AnonymizationEngine;
use crate::errors::AnonymizerError;
use crate::redaction_log::log_passthrough_debug;

/// Default number of lines per parallel batch.
pub const BATCH_SIZE: usize = 4096;

/// Run-level cancellation flag, cheap to clone and share with signal handlers.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Consumer of anonymized lines.
pub trait LineSink {
    /// Accepts one line, without its terminator.
    fn accept_line(&mut self, line: &[u8]) -> io::Result<()>;

    /// Called once after the last line of a run.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Any writer is a sink; every line is terminated with `\n`.
impl<W: Write> LineSink for W {
    fn accept_line(&mut self, line: &[u8]) -> io::Result<()> {
        self.write_all(line)?;
        self.write_all(b"\n")
    }

    fn finish(&mut self) -> io::Result<()> {
        Write::flush(self)
    }
}

/// What happened during one run of the processor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub lines_processed: u64,
    /// Lines written unchanged because they could not be processed.
    pub lines_passed_through: u64,
    pub literal_replacements: usize,
    pub pattern_replacements: usize,
    pub distinct_values: usize,
    /// True when the run stopped early on request.
    pub cancelled: bool,
}

/// Result of processing one batch.
#[derive(Debug, Default)]
pub struct BatchOutput {
    /// One entry per input line, in input order.
    pub lines: Vec<Vec<u8>>,
    pub passed_through: u64,
}

pub struct LineProcessor<'e> {
    engine: &'e dyn AnonymizationEngine,
    batch_size: usize,
    cancel: CancellationToken,
}

impl<'e> LineProcessor<'e> {
    pub fn new(engine: &'e dyn AnonymizationEngine) -> Self {
        Self {
            engine,
            batch_size: BATCH_SIZE,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Anonymizes one raw line. A line that is not valid UTF-8 is returned
    /// unchanged and flagged as passed through; it never fails the run.
    fn process_one(&self, raw: &[u8], line_number: u64) -> Result<(Vec<u8>, bool), AnonymizerError> {
        match std::str::from_utf8(raw) {
            Ok(text) => Ok((self.engine.anonymize_line(text)?.into_bytes(), false)),
            Err(e) => {
                warn!(
                    "Line {} is not valid UTF-8 ({}); writing it unchanged.",
                    line_number, e
                );
                log_passthrough_debug(line_number, "invalid UTF-8");
                Ok((raw.to_vec(), true))
            }
        }
    }

    /// Anonymizes a batch of lines in parallel. `first_line_number` is the
    /// 1-based number of `lines[0]` in the whole input, used for reporting.
    pub fn process_batch(
        &self,
        lines: &[Vec<u8>],
        first_line_number: u64,
    ) -> Result<BatchOutput, AnonymizerError> {
        let processed: Vec<(Vec<u8>, bool)> = lines
            .par_iter()
            .enumerate()
            .map(|(offset, raw)| self.process_one(raw, first_line_number + offset as u64))
            .collect::<Result<_, _>>()?;

        let passed_through = processed.iter().filter(|(_, skipped)| *skipped).count() as u64;
        Ok(BatchOutput {
            lines: processed.into_iter().map(|(line, _)| line).collect(),
            passed_through,
        })
    }

    /// Processes every line of `source` and writes the results to `sink`.
    ///
    /// The cancellation token is checked before each batch; once it is set no
    /// further batch is read, and everything already produced has been
    /// written to the sink.
    pub fn run<I, S>(&self, source: I, sink: &mut S) -> Result<RunSummary, AnonymizerError>
    where
        I: IntoIterator<Item = io::Result<Vec<u8>>>,
        S: LineSink + ?Sized,
    {
        let mut summary = RunSummary::default();
        let mut lines = source.into_iter();
        let mut batch: Vec<Vec<u8>> = Vec::with_capacity(self.batch_size);

        loop {
            if self.cancel.is_cancelled() {
                info!(
                    "Run cancelled after {} lines; remaining input skipped.",
                    summary.lines_processed
                );
                summary.cancelled = true;
                break;
            }

            batch.clear();
            for line in lines.by_ref().take(self.batch_size) {
                batch.push(line?);
            }
            if batch.is_empty() {
                break;
            }

            let output = self.process_batch(&batch, summary.lines_processed + 1)?;
            for line in &output.lines {
                sink.accept_line(line)?;
            }
            summary.lines_processed += batch.len() as u64;
            summary.lines_passed_through += output.passed_through;
            debug!(
                target: "loganon_core::processor",
                "Batch of {} lines done ({} total).",
                batch.len(),
                summary.lines_processed
            );
        }

        sink.finish()?;

        let stats = self.engine.stats();
        summary.literal_replacements = stats.literal_replacements;
        summary.pattern_replacements = stats.pattern_replacements;
        summary.distinct_values = stats.distinct_values;
        Ok(summary)
    }
}
