//! Configuration management for `loganon-core`.
//!
//! A configuration is a flat YAML mapping of rule key to replacement
//! template:
//!
//! ```yaml
//! SECRET_KEY: REDACTED
//! 'password=\S+': 'password=$randstr'
//! ```
//!
//! Keys containing a backslash are pattern rules (regular expressions), all
//! other keys are literal rules. The mapping is kept in document order, which
//! decides tag assignment and precedence between overlapping pattern rules.
//!
//! License: MIT OR Apache-2.0

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use crate::errors::AnonymizerError;

/// A key containing this character is compiled as a regular expression.
pub const PATTERN_ESCAPE: char = '\\';

/// How a rule key is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// Matched and replaced verbatim through the literal mapping.
    Literal,
    /// Matched as a regular expression; the replacement is generated once per
    /// distinct matched text.
    Pattern,
}

/// A single `(key, template)` entry of the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rule {
    /// A literal string or a regular-expression source.
    pub key: String,
    /// The replacement, optionally containing `$variable` tokens and, for
    /// pattern rules, capture-group references.
    pub template: String,
}

impl Rule {
    pub fn new(key: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            template: template.into(),
        }
    }

    pub fn kind(&self) -> RuleKind {
        if self.key.contains(PATTERN_ESCAPE) {
            RuleKind::Pattern
        } else {
            RuleKind::Literal
        }
    }
}

/// The ordered set of rules driving one anonymization run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Builds a rule set from `(key, template)` pairs, keeping their order.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, AnonymizerError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let rules: Vec<Rule> = pairs.into_iter().map(|(k, v)| Rule::new(k, v)).collect();
        validate_rules(&rules)?;
        Ok(Self { rules })
    }

    /// Parses a YAML mapping document.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            warn!("Configuration document is empty; no rules will be applied.");
            return Ok(Self::default());
        }
        let set: RuleSet =
            serde_yml::from_str(text).context("Failed to parse rule mapping")?;
        validate_rules(&set.rules)?;
        Ok(set)
    }

    /// Loads rules from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading rules from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let set = Self::from_yaml_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        info!(
            "Loaded {} rules ({} pattern) from file {}.",
            set.len(),
            set.pattern_rules().count(),
            path.display()
        );
        Ok(set)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn literal_rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(|r| r.kind() == RuleKind::Literal)
    }

    pub fn pattern_rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(|r| r.kind() == RuleKind::Pattern)
    }
}

struct RuleSetVisitor;

impl<'de> Visitor<'de> for RuleSetVisitor {
    type Value = RuleSet;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a mapping of rule key to replacement template")
    }

    fn visit_map<A>(self, mut map: A) -> Result<RuleSet, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut rules = Vec::with_capacity(map.size_hint().unwrap_or(0));
        let mut seen = HashSet::new();
        while let Some(key) = map.next_key::<String>()? {
            // Read as a string so the scalar text is kept exactly as written:
            // `1.10` stays `1.10`, `0x1F` stays `0x1F`.
            let template: String = map.next_value().map_err(|e| {
                <A::Error as de::Error>::custom(format!("rule '{}': template must be a scalar ({})", key, e))
            })?;
            if !seen.insert(key.clone()) {
                return Err(de::Error::custom(format!("duplicate rule key '{}'", key)));
            }
            rules.push(Rule::new(key, template));
        }
        debug!("Deserialized {} rules.", rules.len());
        Ok(RuleSet { rules })
    }
}

impl<'de> Deserialize<'de> for RuleSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(RuleSetVisitor)
    }
}

/// Validates rule integrity (non-empty, unique keys).
fn validate_rules(rules: &[Rule]) -> Result<(), AnonymizerError> {
    let mut keys = HashSet::new();
    let mut errors = Vec::new();

    for (idx, rule) in rules.iter().enumerate() {
        if rule.key.is_empty() {
            errors.push(format!("Rule #{} has an empty key.", idx + 1));
        } else if !keys.insert(rule.key.as_str()) {
            errors.push(format!("Duplicate rule key found: '{}'.", rule.key));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AnonymizerError::InvalidConfiguration(errors.join("\n")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_kind_classification() {
        assert_eq!(Rule::new("SECRET_KEY", "X").kind(), RuleKind::Literal);
        assert_eq!(Rule::new(r"password=\S+", "X").kind(), RuleKind::Pattern);
        // Metacharacters alone do not make a pattern rule.
        assert_eq!(Rule::new("foo.bar", "X").kind(), RuleKind::Literal);
    }

    #[test]
    fn test_yaml_keeps_document_order() -> Result<()> {
        let yaml = "zeta: one\nalpha: two\n'id=\\d+': 'id=$randnum'\nmid: three\n";
        let set = RuleSet::from_yaml_str(yaml)?;
        let keys: Vec<&str> = set.rules().iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha", r"id=\d+", "mid"]);
        assert_eq!(set.pattern_rules().count(), 1);
        assert_eq!(set.literal_rules().count(), 3);
        Ok(())
    }

    #[test]
    fn test_yaml_scalar_templates() -> Result<()> {
        let set = RuleSet::from_yaml_str("port: 8080\nflag: true\nblank:\n")?;
        let templates: Vec<&str> = set.rules().iter().map(|r| r.template.as_str()).collect();
        assert_eq!(templates, vec!["8080", "true", ""]);
        Ok(())
    }

    #[test]
    fn test_yaml_numeric_looking_templates_keep_their_text() -> Result<()> {
        let set = RuleSet::from_yaml_str("ver: 1.10\nzip: 007\nhex: 0x1F\nexp: 1e3\n")?;
        let templates: Vec<&str> = set.rules().iter().map(|r| r.template.as_str()).collect();
        assert_eq!(templates, vec!["1.10", "007", "0x1F", "1e3"]);
        Ok(())
    }

    #[test]
    fn test_yaml_rejects_nested_template() {
        let err = RuleSet::from_yaml_str("nested:\n  - a\n  - b\n").unwrap_err();
        assert!(format!("{:#}", err).contains("nested"));
    }

    #[test]
    fn test_empty_document_is_empty_set() -> Result<()> {
        assert!(RuleSet::from_yaml_str("  \n")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_from_pairs_rejects_empty_and_duplicate_keys() {
        let err = RuleSet::from_pairs([("", "x")]).unwrap_err();
        assert!(err.is_configuration_error());

        let err = RuleSet::from_pairs([("a", "x"), ("a", "y")]).unwrap_err();
        assert!(err.to_string().contains("Duplicate rule key found: 'a'"));
    }
}
