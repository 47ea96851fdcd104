// loganon/src/lib.rs
//! # loganon CLI Application
//!
//! Command-line front end for `loganon-core`: argument parsing, logging
//! setup, status output, and the streaming anonymize command.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod ui;
pub mod utils;

pub use commands::anonymize::{run_anonymize, AnonymizeOptions};
