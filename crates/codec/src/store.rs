//! Case-insensitive flat key/value store built from raw pairs.

use crate::error::{RecordError, RecordErrorReason};
use crate::path::normalize_key;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One `key = value` record as read from, or written to, a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPair {
    /// Key as written.
    pub key: String,
    /// Unquoted value.
    pub value: String,
}

impl RawPair {
    /// Pair from anything string-like.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Lowercased keys mapped to their last value, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct FlatStore {
    entries: IndexMap<String, String>,
}

impl FlatStore {
    /// Build the store; a pair with an empty key rejects the whole input.
    ///
    /// The error's `line` is the 1-based position of the pair.
    pub fn try_from_pairs<I>(pairs: I) -> Result<Self, RecordError>
    where
        I: IntoIterator<Item = RawPair>,
    {
        let mut entries = IndexMap::new();
        for (position, pair) in pairs.into_iter().enumerate() {
            if pair.key.trim().is_empty() {
                return Err(RecordError {
                    line: position + 1,
                    reason: RecordErrorReason::EmptyKey,
                    text: format!("{} = {}", pair.key, pair.value),
                });
            }
            entries.insert(normalize_key(&pair.key), pair.value);
        }
        Ok(Self { entries })
    }

    /// Value for a lowercased key.
    #[must_use]
    pub fn get(&self, lookup: &str) -> Option<&str> {
        self.entries.get(lookup).map(String::as_str)
    }

    /// Lowercased keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the source had no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_are_case_insensitive() -> Result<(), RecordError> {
        let store = FlatStore::try_from_pairs(vec![RawPair::new("virtualHW.version", "10")])?;
        assert_eq!(store.get("virtualhw.version"), Some("10"));
        assert_eq!(store.get("virtualHW.version"), None);
        Ok(())
    }

    #[test]
    fn last_value_wins_first_position_kept() -> Result<(), RecordError> {
        let store = FlatStore::try_from_pairs(vec![
            RawPair::new("memsize", "1024"),
            RawPair::new("numvcpus", "2"),
            RawPair::new("MEMSIZE", "2048"),
        ])?;
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("memsize"), Some("2048"));
        assert_eq!(store.keys().collect::<Vec<_>>(), vec!["memsize", "numvcpus"]);
        Ok(())
    }

    #[test]
    fn empty_key_is_rejected_with_position() {
        let error = FlatStore::try_from_pairs(vec![
            RawPair::new("memsize", "1024"),
            RawPair::new("  ", "x"),
        ])
        .err();
        assert_eq!(error.as_ref().map(|error| error.line), Some(2));
        assert_eq!(
            error.map(|error| error.reason),
            Some(RecordErrorReason::EmptyKey)
        );
    }

    #[test]
    fn empty_input_is_empty_store() -> Result<(), RecordError> {
        let store = FlatStore::try_from_pairs(Vec::new())?;
        assert!(store.is_empty());
        Ok(())
    }
}
