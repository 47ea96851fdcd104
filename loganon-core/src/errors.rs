//! errors.rs - Custom error types for the loganon-core library.
//!
//! This module defines a structured error enum for the library. Configuration
//! problems (bad keys, bad templates, too many pattern rules) are all raised
//! while compiling rules, so a run either starts with a valid rule set or
//! never starts at all.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// This enum represents all possible error types in the `loganon-core` library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AnonymizerError {
    #[error("Failed to compile rule key '{0}': {1}")]
    RuleCompilationError(String, regex::Error),

    #[error("Too many pattern rules: at most {0} can be compiled into one expression")]
    TagSpaceExhausted(usize),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Unknown variable '{0}' in replacement template")]
    UnknownVariable(String),

    #[error("An unexpected I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),

    #[error("A critical system error occurred: {0}")]
    AnyhowWrapper(#[from] anyhow::Error),
}

impl AnonymizerError {
    /// True for every error that stems from the rule configuration rather
    /// than from the data being processed.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::RuleCompilationError(..)
                | Self::TagSpaceExhausted(_)
                | Self::InvalidConfiguration(_)
        )
    }
}
