//! Terminal-facing helpers: status messages and the progress indicator.

pub mod output_format;
pub mod progress;
