//! resolver.rs - Decides the replacement text for a single match.
//!
//! Literal matches are a plain map lookup. Pattern matches go through the
//! run's `ReplacementCache`: the first sighting of a matched text expands the
//! winning rule's template and applies it against the match, every later
//! sighting reuses that result.
//!
//! License: MIT OR APACHE 2.0

use regex::Captures;

use crate::cache::ReplacementCache;
use crate::errors::AnonymizerError;
use crate::redaction_log::log_new_replacement_debug;
use crate::sanitizers::compiler::{LiteralPass, PatternBranch, PatternPass};
use crate::variables;

/// Replacement for a literal-pass match. Returns `None` when the match should
/// be left untouched (empty match, or text that is not a configured key).
pub fn resolve_literal<'a>(pass: &'a LiteralPass, matched: &str) -> Option<&'a str> {
    if matched.is_empty() {
        return None;
    }
    pass.replacement_for(matched)
}

/// The first branch, in configuration order, whose tag group took part in
/// the match.
pub fn winning_branch<'p>(pass: &'p PatternPass, caps: &Captures<'_>) -> Option<&'p PatternBranch> {
    pass.branches
        .iter()
        .find(|branch| caps.get(branch.group_index).is_some())
}

/// Replacement for a pattern-pass match. Returns `None` when the match should
/// be left untouched (empty match, or no branch participated).
pub fn resolve_pattern(
    pass: &PatternPass,
    caps: &Captures<'_>,
    cache: &ReplacementCache,
) -> Result<Option<String>, AnonymizerError> {
    let whole = caps.get(0).map_or("", |m| m.as_str());
    if whole.is_empty() {
        return Ok(None);
    }
    let Some(branch) = winning_branch(pass, caps) else {
        return Ok(None);
    };

    cache
        .get_or_try_insert_with(whole, || -> Result<String, AnonymizerError> {
            let expanded = variables::expand(&branch.template)?;
            let replacement = apply_template(caps, branch, &expanded);
            log_new_replacement_debug(&branch.tag, whole, &replacement);
            Ok(replacement)
        })
        .map(Some)
}

/// Text of a group referenced from a template, by number (relative to the
/// branch's own key, `0` being the whole match) or by name.
fn group_text<'h>(caps: &Captures<'h>, branch: &PatternBranch, reference: &str) -> Option<&'h str> {
    match reference.parse::<usize>() {
        Ok(0) => caps.get(0).map(|m| m.as_str()),
        Ok(n) if n <= branch.group_count => caps.get(branch.group_index + n).map(|m| m.as_str()),
        Ok(_) => None,
        Err(_) => caps.name(reference).map(|m| m.as_str()),
    }
}

/// Applies `template` as a replacement template against the match.
///
/// Supported syntax: `$$` for a literal dollar, `$N` and `${N}` for numbered
/// groups, `${name}` for named groups. Groups that did not participate
/// expand to nothing; a `$` that starts none of these is kept as is.
pub fn apply_template(caps: &Captures<'_>, branch: &PatternBranch, template: &str) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos + 1..];

        if let Some(after) = rest.strip_prefix('$') {
            out.push('$');
            rest = after;
            continue;
        }

        if let Some(braced) = rest.strip_prefix('{') {
            if let Some(close) = braced.find('}') {
                out.push_str(group_text(caps, branch, &braced[..close]).unwrap_or(""));
                rest = &braced[close + 1..];
            } else {
                out.push('$');
            }
            continue;
        }

        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits > 0 {
            out.push_str(group_text(caps, branch, &rest[..digits]).unwrap_or(""));
            rest = &rest[digits..];
        } else {
            out.push('$');
        }
    }

    out.push_str(rest);
    out
}
