// loganon-core/src/headless.rs

//! `headless.rs`
//! Convenience wrapper for anonymizing a whole string in one call, without
//! setting up an engine, processor and sink by hand.

use anyhow::Result;

use crate::config::RuleSet;
use crate::engines::regex_engine::RegexEngine;

/// Anonymizes every line of `content` with a fresh run context.
///
/// Line terminators (`\n` or `\r\n`) are normalized to `\n`; a trailing
/// newline in the input is kept.
pub fn headless_anonymize_string(rules: &RuleSet, content: &str) -> Result<String> {
    let engine = RegexEngine::new(rules)?;
    let lines: Vec<&str> = content.lines().collect();
    let mut anonymized = engine.anonymize_lines(&lines)?.join("\n");
    if content.ends_with('\n') {
        anonymized.push('\n');
    }
    Ok(anonymized)
}
