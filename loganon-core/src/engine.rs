// loganon-core/src/engine.rs
//! Defines the core AnonymizationEngine trait.
//!
//! An engine is the context of one anonymization run: it owns the compiled
//! rules and the run's replacement cache, and it is shared by reference with
//! every worker processing lines. Dropping the engine ends the run.
//!
//! License: MIT OR APACHE 2.0

use crate::cache::ReplacementCache;
use crate::errors::AnonymizerError;
use crate::sanitizers::compiler::CompiledRules;

/// Counters accumulated by an engine over its lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplacementStats {
    pub literal_replacements: usize,
    pub pattern_replacements: usize,
    /// Distinct original values held by the replacement cache.
    pub distinct_values: usize,
}

pub trait AnonymizationEngine: Send + Sync {
    /// Anonymizes one line: the literal pass first, then the pattern pass over
    /// the literal pass's output.
    fn anonymize_line(&self, line: &str) -> Result<String, AnonymizerError>;

    /// Returns a reference to the `CompiledRules` used by the engine.
    fn compiled_rules(&self) -> &CompiledRules;

    /// The replacement cache of the current run.
    fn cache(&self) -> &ReplacementCache;

    fn stats(&self) -> ReplacementStats;
}
