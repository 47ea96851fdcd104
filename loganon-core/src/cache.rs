//! cache.rs - The run-scoped replacement cache.
//!
//! Maps an original matched text to the synthetic value chosen for it. The
//! first worker to see a value decides its replacement; every later
//! occurrence, on any thread, reuses it. Entries are never evicted.
//!
//! License: MIT OR APACHE 2.0

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

#[derive(Debug, Default)]
pub struct ReplacementCache {
    values: DashMap<String, String>,
}

impl ReplacementCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, original: &str) -> Option<String> {
        self.values.get(original).map(|v| v.value().clone())
    }

    /// Returns the cached replacement for `original`, computing and storing it
    /// with `compute` if absent.
    ///
    /// The entry's shard stays write-locked while `compute` runs, so two
    /// threads racing on the same new value cannot both store one: the loser
    /// observes the winner's replacement.
    pub fn get_or_try_insert_with<F, E>(&self, original: &str, compute: F) -> Result<String, E>
    where
        F: FnOnce() -> Result<String, E>,
    {
        if let Some(hit) = self.get(original) {
            return Ok(hit);
        }
        match self.values.entry(original.to_string()) {
            Entry::Occupied(entry) => Ok(entry.get().clone()),
            Entry::Vacant(entry) => {
                let value = compute()?;
                entry.insert(value.clone());
                Ok(value)
            }
        }
    }

    /// Number of distinct original values seen so far.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
