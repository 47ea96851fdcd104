// loganon-core/src/redaction_log.rs
//! Debug logging helpers that keep original sensitive values out of logs.
//!
//! Matched values are shown verbatim only when `LOGANON_ALLOW_DEBUG_PII=true`
//! is set in the environment; otherwise they are reduced to a length hint.

use log::debug;
use once_cell::sync::Lazy;

/// Read once per process.
static PII_DEBUG_ALLOWED: Lazy<bool> = Lazy::new(|| {
    std::env::var("LOGANON_ALLOW_DEBUG_PII")
        .map(|s| s.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
});

pub fn redact_sensitive(s: &str) -> String {
    const MAX_LEN: usize = 8;
    if s.len() <= MAX_LEN {
        "[REDACTED]".to_string()
    } else {
        format!("[REDACTED: {} chars]", s.len())
    }
}

pub fn loggable(sensitive_content: &str) -> String {
    if *PII_DEBUG_ALLOWED {
        sensitive_content.to_string()
    } else {
        redact_sensitive(sensitive_content)
    }
}

pub fn log_new_replacement_debug(tag: &str, original: &str, replacement: &str) {
    debug!(
        target: "loganon_core::resolver",
        "New replacement for rule '{}': Original='{}', Replacement='{}'",
        tag,
        loggable(original),
        replacement
    );
}

pub fn log_passthrough_debug(line_number: u64, reason: &str) {
    debug!(
        target: "loganon_core::processor",
        "Line {} passed through unchanged: {}",
        line_number,
        reason
    );
}
