// src/pipeline/dedup.rs

//! Sent-set bookkeeping for a cycle.
//!
//! After a cycle the persisted set is `(previous ∩ active) ∪ attempted`, so
//! it only ever holds IDs that are still in the feed.

use std::collections::HashSet;

use crate::models::{AlertRecord, SentAlertSet};

/// IDs of every alert in the current feed.
pub fn active_ids(alerts: &[AlertRecord]) -> HashSet<&str> {
    alerts.iter().map(|a| a.id.as_str()).collect()
}

/// Keep previously sent IDs that are still active, in their original order.
pub fn prune(previous: &SentAlertSet, active: &HashSet<&str>) -> SentAlertSet {
    SentAlertSet::from_ids(previous.iter().filter(|id| active.contains(id)))
}

/// Alerts not yet announced, in feed order. Repeated IDs appear once.
pub fn pending<'a>(alerts: &'a [AlertRecord], previous: &SentAlertSet) -> Vec<&'a AlertRecord> {
    let sent = previous.to_lookup();
    let mut seen = HashSet::new();
    alerts
        .iter()
        .filter(|a| !sent.contains(a.id.as_str()))
        .filter(|a| seen.insert(a.id.as_str()))
        .collect()
}

/// Append attempted IDs to the pruned set.
pub fn merge<'a>(
    pruned: SentAlertSet,
    attempted: impl IntoIterator<Item = &'a str>,
) -> SentAlertSet {
    let mut next = pruned;
    next.extend(attempted);
    next
}
