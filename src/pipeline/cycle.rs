// src/pipeline/cycle.rs

//! One fetch → classify → dispatch → persist pass.

use std::fmt;
use std::sync::Arc;

use futures::stream::{self, StreamExt};

use crate::error::{DispatchError, Result};
use crate::models::{AlertRecord, ChannelConfig, SentAlertSet, classify};
use crate::services::{AlertSource, ChannelRouter, Dispatcher, parser};
use crate::storage::{ChannelConfigStore, SentAlertStore};

use super::dedup;

/// Counters for a finished cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Alerts in the feed
    pub active: usize,
    /// Active alerts that were announced in an earlier cycle
    pub already_sent: usize,
    /// Sent IDs dropped because their alert left the feed
    pub pruned: usize,
    /// New alerts that matched no category
    pub unclassified: usize,
    /// New alerts whose category has no channel
    pub unrouted: usize,
    /// Deliveries that succeeded
    pub dispatched: usize,
    /// Deliveries the messaging backend rejected
    pub failed: usize,
    /// Size of the sent set written at the end
    pub sent_total: usize,
    /// Whether the sent set was saved
    pub persisted: bool,
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} active, {} already sent, {} dispatched, {} failed, {} unrouted, \
             {} unclassified, {} pruned, {} tracked",
            self.active,
            self.already_sent,
            self.dispatched,
            self.failed,
            self.unrouted,
            self.unclassified,
            self.pruned,
            self.sent_total
        )
    }
}

/// Everything a cycle needs, injected at construction.
#[derive(Clone)]
pub struct Relay {
    source: Arc<dyn AlertSource>,
    sent_store: Arc<dyn SentAlertStore>,
    channel_store: Arc<dyn ChannelConfigStore>,
    dispatcher: Dispatcher,
    max_concurrent: usize,
}

impl Relay {
    pub fn new(
        source: Arc<dyn AlertSource>,
        sent_store: Arc<dyn SentAlertStore>,
        channel_store: Arc<dyn ChannelConfigStore>,
        dispatcher: Dispatcher,
    ) -> Self {
        Self {
            source,
            sent_store,
            channel_store,
            dispatcher,
            max_concurrent: 1,
        }
    }

    /// Allow up to `limit` deliveries in flight within a cycle.
    pub fn with_max_concurrent(mut self, limit: usize) -> Self {
        self.max_concurrent = limit.max(1);
        self
    }

    /// Run one cycle.
    ///
    /// Fetch and parse failures are returned before any state is read or
    /// written. Everything after that is non-fatal: unreadable state is
    /// treated as empty, delivery failures are counted, and a failed save is
    /// reported through [`CycleReport::persisted`].
    pub async fn run_cycle(&self) -> Result<CycleReport> {
        let bytes = self.source.fetch().await?;
        let alerts = parser::parse(&bytes)?;

        let channels = self.channel_store.load_channels().await.unwrap_or_else(|e| {
            log::warn!("Channel config unreadable, treating all channels as unset: {}", e);
            ChannelConfig::default()
        });
        let previous = self.sent_store.load_sent().await.unwrap_or_else(|e| {
            log::warn!("Sent alert state unreadable, starting empty: {}", e);
            SentAlertSet::new()
        });

        let active = dedup::active_ids(&alerts);
        let pruned = dedup::prune(&previous, &active);
        let pending = dedup::pending(&alerts, &previous);

        let mut report = CycleReport {
            active: alerts.len(),
            already_sent: pruned.len(),
            pruned: previous.len() - pruned.len(),
            ..CycleReport::default()
        };

        let router = ChannelRouter::new(channels);
        let mut jobs = Vec::new();
        for alert in pending {
            match classify(&alert.event) {
                Some(category) => jobs.push((alert.clone(), category, router.resolve(category))),
                None => {
                    log::debug!("Ignoring unclassified event '{}' ({})", alert.event, alert.id);
                    report.unclassified += 1;
                }
            }
        }

        let dispatcher = self.dispatcher.clone();
        let outcomes: Vec<(AlertRecord, std::result::Result<(), DispatchError>)> =
            stream::iter(jobs)
                .map(move |(alert, category, channel)| {
                    let dispatcher = dispatcher.clone();
                    async move {
                        let result = match channel {
                            Some(channel) => dispatcher.dispatch(&alert, &channel).await,
                            None => Err(DispatchError::ChannelUnresolved(category.to_string())),
                        };
                        (alert, result)
                    }
                })
                .buffered(self.max_concurrent)
                .collect()
                .await;

        let mut attempted: Vec<String> = Vec::with_capacity(outcomes.len());
        for (alert, result) in outcomes {
            match result {
                Ok(()) => {
                    log::info!("Sent {} ({})", alert.title(), alert.id);
                    report.dispatched += 1;
                }
                Err(e @ DispatchError::ChannelUnresolved(_)) => {
                    log::warn!("Not sending {}: {}", alert.id, e);
                    report.unrouted += 1;
                }
                Err(e) => {
                    log::error!("Failed to deliver {}: {}", alert.id, e);
                    report.failed += 1;
                }
            }
            // Attempted alerts are recorded whatever the outcome
            attempted.push(alert.id);
        }

        let next = dedup::merge(pruned, attempted.iter().map(String::as_str));
        report.sent_total = next.len();

        match self.sent_store.save_sent(&next).await {
            Ok(()) => report.persisted = true,
            Err(e) => log::error!("Failed to save sent alert state: {}", e),
        }

        Ok(report)
    }
}
