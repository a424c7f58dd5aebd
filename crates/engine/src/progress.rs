// SPDX-License-Identifier: MIT

//! Progress reporting for outstanding wait conditions.
//!
//! The reporter runs beside the condition tasks on the same poll interval and
//! only ever reads the state table. It never affects the wait outcome.

use crate::state::StateTable;
use heph_core::ResourceRef;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Snapshot of the resources still being waited on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressReport {
    /// Resources whose condition is still pending, in declaration order
    pub pending: Vec<ResourceRef>,
    /// Number of conditions in the wait set
    pub total: usize,
}

impl ProgressReport {
    /// Conditions that have reached a terminal state
    pub fn settled(&self) -> usize {
        self.total.saturating_sub(self.pending.len())
    }
}

pub(crate) struct ProgressReporter {
    pub(crate) states: StateTable,
    pub(crate) interval: Duration,
    pub(crate) cancel: CancellationToken,
    pub(crate) sink: Option<mpsc::Sender<ProgressReport>>,
}

impl ProgressReporter {
    pub(crate) async fn run(self) {
        // First report one interval in; the initial poll round is still in flight
        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                () = self.cancel.cancelled() => break,
                _ = ticker.tick() => self.report(),
            }
        }

        tracing::trace!("progress reporter stopped");
    }

    fn report(&self) {
        let pending = self.states.pending();
        if pending.is_empty() {
            return;
        }

        let names: Vec<String> = pending.iter().map(ToString::to_string).collect();
        tracing::info!(
            count = pending.len(),
            resources = %names.join(", "),
            "waiting on resources to reach the required condition/phase"
        );

        if let Some(sink) = &self.sink {
            let report = ProgressReport {
                pending,
                total: self.states.len(),
            };
            // Full or closed channels drop the report
            if let Err(e) = sink.try_send(report) {
                tracing::trace!(error = %e, "progress report dropped");
            }
        }
    }
}

#[cfg(test)]
#[path = "progress_tests.rs"]
mod tests;
