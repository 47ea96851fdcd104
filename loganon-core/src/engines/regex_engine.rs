// loganon-core/src/engines/regex_engine.rs
//! An `AnonymizationEngine` that applies the combined literal and pattern
//! expressions produced by the rule compiler.
//! License: MIT OR APACHE 2.0

use rayon::prelude::*;
use std::borrow::Cow;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::cache::ReplacementCache;
use crate::config::RuleSet;
use crate::engine::{AnonymizationEngine, ReplacementStats};
use crate::errors::AnonymizerError;
use crate::sanitizers::compiler::{compile_rules, CompiledRules};
use crate::sanitizers::resolver::{resolve_literal, resolve_pattern};

#[derive(Debug)]
pub struct RegexEngine {
    compiled_rules: Arc<CompiledRules>,
    cache: ReplacementCache,
    literal_replacements: AtomicUsize,
    pattern_replacements: AtomicUsize,
}

impl RegexEngine {
    /// Compiles `rules` and starts a run with an empty cache.
    pub fn new(rules: &RuleSet) -> Result<Self, AnonymizerError> {
        Ok(Self::with_compiled(Arc::new(compile_rules(rules)?)))
    }

    /// Starts a new run over already compiled rules. Runs never share a cache.
    pub fn with_compiled(compiled_rules: Arc<CompiledRules>) -> Self {
        Self {
            compiled_rules,
            cache: ReplacementCache::new(),
            literal_replacements: AtomicUsize::new(0),
            pattern_replacements: AtomicUsize::new(0),
        }
    }

    /// Anonymizes `lines` in parallel. The output keeps the input order.
    pub fn anonymize_lines<S>(&self, lines: &[S]) -> Result<Vec<String>, AnonymizerError>
    where
        S: AsRef<str> + Sync,
    {
        lines
            .par_iter()
            .map(|line| self.anonymize_line(line.as_ref()))
            .collect()
    }

    fn apply_literal_pass<'h>(&self, line: &'h str) -> Cow<'h, str> {
        let Some(pass) = self.compiled_rules.literal.as_ref() else {
            return Cow::Borrowed(line);
        };

        let mut out: Option<String> = None;
        let mut last_end = 0;
        let mut count = 0;
        for m in pass.regex.find_iter(line) {
            let Some(replacement) = resolve_literal(pass, m.as_str()) else {
                continue;
            };
            let buf = out.get_or_insert_with(|| String::with_capacity(line.len()));
            buf.push_str(&line[last_end..m.start()]);
            buf.push_str(replacement);
            last_end = m.end();
            count += 1;
        }

        match out {
            Some(mut buf) => {
                buf.push_str(&line[last_end..]);
                self.literal_replacements.fetch_add(count, Ordering::Relaxed);
                Cow::Owned(buf)
            }
            None => Cow::Borrowed(line),
        }
    }

    fn apply_pattern_pass<'h>(&self, line: &'h str) -> Result<Cow<'h, str>, AnonymizerError> {
        let Some(pass) = self.compiled_rules.pattern.as_ref() else {
            return Ok(Cow::Borrowed(line));
        };

        let mut out: Option<String> = None;
        let mut last_end = 0;
        let mut count = 0;
        for caps in pass.regex.captures_iter(line) {
            let Some(replacement) = resolve_pattern(pass, &caps, &self.cache)? else {
                continue;
            };
            let Some(m) = caps.get(0) else {
                continue;
            };
            let buf = out.get_or_insert_with(|| String::with_capacity(line.len() + 16));
            buf.push_str(&line[last_end..m.start()]);
            buf.push_str(&replacement);
            last_end = m.end();
            count += 1;
        }

        Ok(match out {
            Some(mut buf) => {
                buf.push_str(&line[last_end..]);
                self.pattern_replacements.fetch_add(count, Ordering::Relaxed);
                Cow::Owned(buf)
            }
            None => Cow::Borrowed(line),
        })
    }
}

impl AnonymizationEngine for RegexEngine {
    fn anonymize_line(&self, line: &str) -> Result<String, AnonymizerError> {
        let literal_done = self.apply_literal_pass(line);
        let pattern_done = self.apply_pattern_pass(&literal_done)?;
        Ok(pattern_done.into_owned())
    }

    fn compiled_rules(&self) -> &CompiledRules {
        &self.compiled_rules
    }

    fn cache(&self) -> &ReplacementCache {
        &self.cache
    }

    fn stats(&self) -> ReplacementStats {
        ReplacementStats {
            literal_replacements: self.literal_replacements.load(Ordering::Relaxed),
            pattern_replacements: self.pattern_replacements.load(Ordering::Relaxed),
            distinct_values: self.cache.len(),
        }
    }
}
