//! compiler.rs - Turns a `RuleSet` into the two combined match expressions.
//!
//! Literal rules become one alternation `k1|k2|...` backed by a key to
//! replacement map. Pattern rules become one alternation of tagged groups
//! `(?P<a>k1)|(?P<b>k2)|...` backed by one `PatternBranch` per rule. Both are
//! compiled once and are read-only afterwards.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, warn};
use regex::{Regex, RegexBuilder};
use std::collections::{HashMap, HashSet};

use crate::config::{Rule, RuleKind, RuleSet};
use crate::errors::AnonymizerError;
use crate::sanitizers::tags::{TagSequence, MAX_PATTERN_RULES};
use crate::variables;

/// Compiled-size limit for every expression the compiler builds.
const REGEX_SIZE_LIMIT: usize = 10 * (1 << 20);

/// The literal pass: one alternation of all literal keys.
#[derive(Debug)]
pub struct LiteralPass {
    pub regex: Regex,
    /// Exact key to replacement. A match whose text is not a key (possible
    /// when a key carries regex metacharacters) is left as is.
    pub replacements: HashMap<String, String>,
}

impl LiteralPass {
    pub fn replacement_for(&self, matched: &str) -> Option<&str> {
        self.replacements.get(matched).map(String::as_str)
    }
}

/// One pattern rule inside the combined pattern expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternBranch {
    /// Capture-group name wrapping this rule's key.
    pub tag: String,
    pub key: String,
    pub template: String,
    /// Capture index of the tag group in the combined expression. The key's
    /// own group `n` sits at `group_index + n`.
    pub group_index: usize,
    /// Number of capture groups the key declares itself.
    pub group_count: usize,
}

/// The pattern pass: one alternation of tagged groups, in configuration order.
#[derive(Debug)]
pub struct PatternPass {
    pub regex: Regex,
    pub branches: Vec<PatternBranch>,
}

/// Represents both compiled passes for efficient anonymization.
///
/// A pass is `None` when the configuration has no rule of that kind; an empty
/// alternation would otherwise match the empty string everywhere.
#[derive(Debug, Default)]
pub struct CompiledRules {
    pub literal: Option<LiteralPass>,
    pub pattern: Option<PatternPass>,
}

impl CompiledRules {
    pub fn literal_count(&self) -> usize {
        self.literal.as_ref().map_or(0, |p| p.replacements.len())
    }

    pub fn pattern_count(&self) -> usize {
        self.pattern.as_ref().map_or(0, |p| p.branches.len())
    }
}

fn build_regex(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern)
        .size_limit(REGEX_SIZE_LIMIT)
        .build()
}

/// Per-key facts gathered while checking each pattern key on its own.
struct CheckedPattern<'a> {
    rule: &'a Rule,
    group_count: usize,
    group_names: Vec<String>,
}

/// Compiles a `RuleSet` into `CompiledRules`.
///
/// Every key is first compiled on its own, so a syntax error names the
/// offending key, and every pattern template is checked for unknown variables.
/// All problems are collected before failing.
///
/// At most `MAX_PATTERN_RULES` pattern rules fit in one combined expression
/// (every tag of one to four letters); more fail with `TagSpaceExhausted`.
pub fn compile_rules(rule_set: &RuleSet) -> Result<CompiledRules, AnonymizerError> {
    compile_rules_with_tag_limit(rule_set, MAX_PATTERN_RULES)
}

fn compile_rules_with_tag_limit(
    rule_set: &RuleSet,
    tag_limit: usize,
) -> Result<CompiledRules, AnonymizerError> {
    debug!(
        target: "loganon_core::compiler",
        "Starting compilation of {} rules.",
        rule_set.len()
    );

    let mut errors: Vec<AnonymizerError> = Vec::new();
    let mut literals: Vec<&Rule> = Vec::new();
    let mut patterns: Vec<CheckedPattern> = Vec::new();

    for rule in rule_set.rules() {
        let regex = match build_regex(&rule.key) {
            Ok(regex) => regex,
            Err(e) => {
                errors.push(AnonymizerError::RuleCompilationError(rule.key.clone(), e));
                continue;
            }
        };

        match rule.kind() {
            RuleKind::Literal => {
                if !variables::variables_in(&rule.template).map_or(true, |v| v.is_empty()) {
                    warn!(
                        "Literal rule '{}' has variables in its template; literal replacements are used verbatim.",
                        rule.key
                    );
                }
                literals.push(rule);
            }
            RuleKind::Pattern => {
                if let Err(e) = variables::validate_template(&rule.template) {
                    errors.push(e);
                    continue;
                }
                patterns.push(CheckedPattern {
                    rule,
                    group_count: regex.captures_len() - 1,
                    group_names: regex.capture_names().flatten().map(str::to_string).collect(),
                });
            }
        }
    }

    if let Err(e) = check_group_names(&patterns) {
        errors.push(e);
    }

    if let Some(err) = collapse_errors(errors) {
        return Err(err);
    }

    let literal = compile_literal_pass(&literals)?;
    let pattern = compile_pattern_pass(&patterns, TagSequence::with_limit(tag_limit))?;

    let compiled = CompiledRules { literal, pattern };
    debug!(
        target: "loganon_core::compiler",
        "Finished compiling rules. Literal: {}, pattern: {}.",
        compiled.literal_count(),
        compiled.pattern_count()
    );
    Ok(compiled)
}

/// One error is returned as is; several are folded into one report.
fn collapse_errors(mut errors: Vec<AnonymizerError>) -> Option<AnonymizerError> {
    match errors.len() {
        0 => None,
        1 => errors.pop(),
        n => {
            let message = errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<String>>()
                .join("\n");
            Some(AnonymizerError::InvalidConfiguration(format!(
                "Failed to compile {} rule(s):\n{}",
                n, message
            )))
        }
    }
}

/// Two keys declaring the same group name cannot share one expression.
fn check_group_names(patterns: &[CheckedPattern]) -> Result<(), AnonymizerError> {
    let mut owners: HashMap<&str, &str> = HashMap::new();
    for p in patterns {
        for name in &p.group_names {
            if let Some(other) = owners.insert(name.as_str(), p.rule.key.as_str()) {
                return Err(AnonymizerError::InvalidConfiguration(format!(
                    "capture group name '{}' is declared by both '{}' and '{}'",
                    name, other, p.rule.key
                )));
            }
        }
    }
    Ok(())
}

fn compile_literal_pass(literals: &[&Rule]) -> Result<Option<LiteralPass>, AnonymizerError> {
    if literals.is_empty() {
        debug!(target: "loganon_core::compiler", "No literal rules; literal pass disabled.");
        return Ok(None);
    }

    let source = literals
        .iter()
        .map(|r| r.key.as_str())
        .collect::<Vec<&str>>()
        .join("|");
    let regex = build_regex(&source).map_err(|e| {
        AnonymizerError::RuleCompilationError("<combined literal expression>".to_string(), e)
    })?;
    let replacements = literals
        .iter()
        .map(|r| (r.key.clone(), r.template.clone()))
        .collect();

    Ok(Some(LiteralPass { regex, replacements }))
}

fn compile_pattern_pass(
    patterns: &[CheckedPattern],
    mut sequence: TagSequence,
) -> Result<Option<PatternPass>, AnonymizerError> {
    if patterns.is_empty() {
        debug!(target: "loganon_core::compiler", "No pattern rules; pattern pass disabled.");
        return Ok(None);
    }

    // Names already used inside the keys are never handed out as tags.
    let reserved: HashSet<&str> = patterns
        .iter()
        .flat_map(|p| p.group_names.iter().map(String::as_str))
        .collect();
    let tag_limit = sequence.limit();
    let mut tags = sequence.by_ref().filter(|t| !reserved.contains(t.as_str()));

    let mut source = String::new();
    let mut branches = Vec::with_capacity(patterns.len());
    for p in patterns {
        let tag = tags
            .next()
            .ok_or(AnonymizerError::TagSpaceExhausted(tag_limit))?;
        if !source.is_empty() {
            source.push('|');
        }
        source.push_str(&format!("(?P<{}>{})", tag, p.rule.key));
        debug!(
            target: "loganon_core::compiler",
            "Pattern rule '{}' tagged '{}'.",
            p.rule.key,
            tag
        );
        branches.push(PatternBranch {
            tag,
            key: p.rule.key.clone(),
            template: p.rule.template.clone(),
            group_index: 0,
            group_count: p.group_count,
        });
    }

    debug!(
        target: "loganon_core::compiler",
        "{} tags issued for {} pattern rules.",
        sequence.issued(),
        branches.len()
    );

    let regex = build_regex(&source).map_err(|e| {
        AnonymizerError::RuleCompilationError("<combined pattern expression>".to_string(), e)
    })?;

    let indices: HashMap<&str, usize> = regex
        .capture_names()
        .enumerate()
        .filter_map(|(idx, name)| name.map(|n| (n, idx)))
        .collect();
    for branch in &mut branches {
        branch.group_index = *indices.get(branch.tag.as_str()).ok_or_else(|| {
            AnonymizerError::InvalidConfiguration(format!(
                "tag group '{}' missing from the combined expression",
                branch.tag
            ))
        })?;
    }

    Ok(Some(PatternPass { regex, branches }))
}
