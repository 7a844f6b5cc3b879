// src/pipeline/scheduler.rs

//! Timer-driven, single-flight cycle execution.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::AppError;

use super::cycle::{CycleReport, Relay};

/// What a single tick did.
#[derive(Debug)]
pub enum TickOutcome {
    /// A cycle ran to the end
    Completed(CycleReport),
    /// The cycle stopped early on a fetch or parse error
    Failed(AppError),
    /// Another cycle was still running
    Skipped,
}

/// Clears the running flag when a cycle ends, including on panic.
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Runs cycles on a timer, never more than one at a time.
pub struct Orchestrator {
    relay: Relay,
    running: AtomicBool,
}

impl Orchestrator {
    pub fn new(relay: Relay) -> Self {
        Self {
            relay,
            running: AtomicBool::new(false),
        }
    }

    /// Whether a cycle is in flight.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Start a cycle unless one is already running.
    pub async fn tick(&self) -> TickOutcome {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::warn!("Previous cycle still running, skipping tick");
            return TickOutcome::Skipped;
        }
        let _guard = RunningGuard(&self.running);

        match self.relay.run_cycle().await {
            Ok(report) => {
                if report.dispatched > 0 || report.failed > 0 {
                    log::info!("Cycle complete: {}", report);
                } else {
                    log::debug!("Cycle complete: {}", report);
                }
                TickOutcome::Completed(report)
            }
            Err(e) => {
                log::warn!("Cycle aborted: {}", e);
                TickOutcome::Failed(e)
            }
        }
    }

    /// Tick every `period` until `shutdown` resolves.
    ///
    /// Each tick runs on its own task, so a slow cycle makes the following
    /// ticks skip instead of queueing. In-flight cycles are awaited before
    /// returning.
    pub async fn run<F>(self: Arc<Self>, period: Duration, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        log::info!("Polling every {}s", period.as_secs());

        let mut in_flight: Vec<JoinHandle<TickOutcome>> = Vec::new();
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    log::info!("Shutdown requested, stopping scheduler");
                    break;
                }
                _ = interval.tick() => {
                    in_flight.retain(|handle| !handle.is_finished());
                    let this = Arc::clone(&self);
                    in_flight.push(tokio::spawn(async move { this.tick().await }));
                }
            }
        }

        for handle in in_flight {
            if let Err(e) = handle.await {
                log::error!("Cycle task failed: {}", e);
            }
        }
    }
}
