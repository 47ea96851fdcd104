// loganon/src/ui/progress.rs
//! Dot-per-N-lines progress indicator for long runs.

use std::io::{self, Write};

/// Lines written between two progress dots.
pub const PROGRESS_INTERVAL: u64 = 100_000;

/// Writer adapter that counts the lines passing through it and emits a `.`
/// on `progress` every `interval` lines.
///
/// Because it is a plain `Write`, it can be handed to the line processor as a
/// sink directly.
pub struct ProgressWriter<W: Write, P: Write> {
    inner: W,
    progress: P,
    interval: u64,
    lines: u64,
    dots: u64,
}

impl<W: Write, P: Write> ProgressWriter<W, P> {
    pub fn new(inner: W, progress: P) -> Self {
        Self::with_interval(inner, progress, PROGRESS_INTERVAL)
    }

    pub fn with_interval(inner: W, progress: P, interval: u64) -> Self {
        Self {
            inner,
            progress,
            interval: interval.max(1),
            lines: 0,
            dots: 0,
        }
    }

    /// Number of dots printed so far.
    pub fn dots(&self) -> u64 {
        self.dots
    }

    pub fn lines(&self) -> u64 {
        self.lines
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write, P: Write> Write for ProgressWriter<W, P> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        for _ in buf[..written].iter().filter(|&&b| b == b'\n') {
            self.lines += 1;
            if self.lines % self.interval == 0 {
                self.dots += 1;
                // The indicator is cosmetic; a closed stderr must not fail the run.
                let _ = self.progress.write_all(b".");
                let _ = self.progress.flush();
            }
        }
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loganon_core::LineSink;

    #[test]
    fn test_dot_every_interval() {
        let mut sink = ProgressWriter::with_interval(Vec::new(), Vec::new(), 3);
        for i in 0..7 {
            sink.accept_line(format!("line {}", i).as_bytes()).unwrap();
        }
        sink.finish().unwrap();
        assert_eq!(sink.lines(), 7);
        assert_eq!(sink.dots(), 2);
        assert_eq!(sink.progress, b"..");
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out.lines().count(), 7);
        assert!(out.ends_with("line 6\n"));
    }

    #[test]
    fn test_no_dot_below_interval() {
        let mut sink = ProgressWriter::new(Vec::new(), Vec::new());
        sink.accept_line(b"only").unwrap();
        assert_eq!(sink.dots(), 0);
        assert!(sink.progress.is_empty());
    }
}
