//! tags.rs - Capture-group names for pattern rules.
//!
//! Tags run `a, b, ..., z, aa, ab, ..., zz, aaa, ...` (bijective base 26 over
//! lowercase letters). A fresh `TagSequence` is created for every compilation,
//! so the sequence never repeats inside one combined expression.
//!
//! License: MIT OR APACHE 2.0

/// Longest tag the compiler will hand out.
pub const MAX_TAG_LEN: u32 = 4;

/// Number of pattern rules one compilation supports: every tag of length
/// 1 to `MAX_TAG_LEN`, i.e. 26 + 26^2 + 26^3 + 26^4.
pub const MAX_PATTERN_RULES: usize = {
    let mut total = 0usize;
    let mut len = 1;
    while len <= MAX_TAG_LEN {
        total += 26usize.pow(len);
        len += 1;
    }
    total
};

/// Iterator over tags, bounded by `MAX_PATTERN_RULES` or a smaller limit.
#[derive(Debug, Clone)]
pub struct TagSequence {
    next_index: usize,
    limit: usize,
}

impl Default for TagSequence {
    fn default() -> Self {
        Self::with_limit(MAX_PATTERN_RULES)
    }
}

impl TagSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sequence that stops after `limit` tags (never more than
    /// `MAX_PATTERN_RULES`).
    pub fn with_limit(limit: usize) -> Self {
        Self {
            next_index: 0,
            limit: limit.min(MAX_PATTERN_RULES),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// How many tags have been handed out so far.
    pub fn issued(&self) -> usize {
        self.next_index
    }
}

/// The tag at position `index` (zero based), e.g. `0 -> "a"`, `26 -> "aa"`.
pub fn tag_for_index(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push(b'a' + (n % 26) as u8);
        n /= 26;
    }
    letters.iter().rev().map(|&b| char::from(b)).collect()
}

impl Iterator for TagSequence {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.next_index >= self.limit {
            return None;
        }
        let tag = tag_for_index(self.next_index);
        self.next_index += 1;
        Some(tag)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.limit - self.next_index;
        (remaining, Some(remaining))
    }
}
