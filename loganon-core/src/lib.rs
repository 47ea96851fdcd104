// loganon-core/src/lib.rs
//! # loganon Core Library
//!
//! `loganon-core` replaces sensitive tokens in line-oriented text with fixed
//! substitutes or synthetic values, and guarantees that every distinct
//! original value receives exactly one replacement for the duration of a run.
//!
//! The library does no I/O of its own apart from reading a configuration
//! file on request: lines come from any iterator and go to any `LineSink`.
//!
//! ## Modules
//!
//! * `config`: `Rule` and `RuleSet`, loaded from a flat YAML mapping.
//! * `generators`: random strings, numbers, IPv4 addresses, hostnames, emails.
//! * `variables`: the `$randstr`-style template tokens.
//! * `sanitizers`: rule compilation (`compiler`, `tags`) and match resolution (`resolver`).
//! * `cache`: the run-scoped replacement cache.
//! * `engine`: the `AnonymizationEngine` trait.
//! * `engines`: concrete engines (`RegexEngine`).
//! * `processor`: batched, parallel line processing with cancellation.
//! * `headless`: one-shot anonymization of a string.
//! * `redaction_log`: debug logging that keeps original values out of logs.
//!
//! ## Usage Example
//!
//! ```rust
//! use loganon_core::{headless_anonymize_string, RuleSet};
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     let rules = RuleSet::from_yaml_str(
//!         "SECRET_KEY: REDACTED\n'password=\\S+': 'password=$randstr'\n",
//!     )?;
//!
//!     let out = headless_anonymize_string(&rules, "key is SECRET_KEY here\n")?;
//!     assert_eq!(out, "key is REDACTED here\n");
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Compilation and resolution return `AnonymizerError`; configuration
//! problems are all detected before the first line is processed. File
//! loading and the headless helper use `anyhow::Error` for context.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod cache;
pub mod config;
pub mod engine;
pub mod engines;
pub mod errors;
pub mod generators;
pub mod headless;
pub mod processor;
pub mod redaction_log;
pub mod sanitizers;
pub mod variables;

/// Re-exports the configuration types for building rule sets.
pub use config::{Rule, RuleKind, RuleSet, PATTERN_ESCAPE};

/// Re-exports the custom error type for clear error reporting.
pub use errors::AnonymizerError;

/// Re-exports the engine trait and its concrete implementation.
pub use engine::{AnonymizationEngine, ReplacementStats};
pub use engines::regex_engine::RegexEngine;

pub use cache::ReplacementCache;

/// Re-exports the line processor and its collaborators.
pub use processor::{BatchOutput, CancellationToken, LineProcessor, LineSink, RunSummary, BATCH_SIZE};

pub use variables::Variable;

/// Re-exports the one-shot helper for non-streaming use.
pub use headless::headless_anonymize_string;

// Re-export key types from the sanitizers modules for advanced usage.
pub use sanitizers::compiler::{compile_rules, CompiledRules, LiteralPass, PatternBranch, PatternPass};
pub use sanitizers::tags::{TagSequence, MAX_PATTERN_RULES};
