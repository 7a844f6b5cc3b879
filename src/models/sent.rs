// src/models/sent.rs

//! Record of alerts that have already been announced.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Ordered, duplicate-free set of alert IDs already dispatched.
///
/// Persisted as `{"sent_ids": [...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SentAlertSet {
    #[serde(default)]
    sent_ids: Vec<String>,
}

impl SentAlertSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from IDs, dropping repeats while keeping first-seen order.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::new();
        set.extend(ids);
        set
    }

    /// Append a single ID. Returns `false` if it was already present.
    ///
    /// Linear in the set size; use [`Extend`] for batches.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.contains(&id) {
            return false;
        }
        self.sent_ids.push(id);
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sent_ids.iter().any(|s| s == id)
    }

    pub fn len(&self) -> usize {
        self.sent_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sent_ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.sent_ids.iter().map(String::as_str)
    }

    /// Lookup-friendly view for per-cycle membership checks.
    pub fn to_lookup(&self) -> HashSet<&str> {
        self.iter().collect()
    }
}

impl<S: Into<String>> Extend<S> for SentAlertSet {
    /// Append IDs in order, skipping any already present.
    fn extend<I: IntoIterator<Item = S>>(&mut self, ids: I) {
        let mut seen: HashSet<String> = self.sent_ids.iter().cloned().collect();
        for id in ids {
            let id = id.into();
            if seen.insert(id.clone()) {
                self.sent_ids.push(id);
            }
        }
    }
}
