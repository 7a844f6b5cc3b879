//! Pipeline entry points.
//!
//! - `Relay::run_cycle`: one fetch → classify → dispatch → persist pass
//! - `Orchestrator`: runs cycles on a timer, one at a time
//! - `run_configure`: administrative channel configuration

pub mod configure;
pub mod cycle;
pub mod dedup;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod test_support;

pub use configure::run_configure;
pub use cycle::{CycleReport, Relay};
pub use scheduler::{Orchestrator, TickOutcome};
