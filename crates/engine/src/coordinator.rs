// SPDX-License-Identifier: MIT

//! Concurrent wait coordinator.
//!
//! Runs one condition task per wait condition plus a progress reporter, all
//! under a single cancellation token derived from the caller's. The first
//! task to fail cancels the rest and its error is returned.

use crate::error::WaitError;
use crate::progress::ProgressReporter;
use crate::state::StateTable;
use crate::task::ConditionTask;
use crate::waiter::WaitPlan;
use heph_adapters::StatusProvider;
use std::collections::HashMap;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

impl<P: StatusProvider> WaitPlan<P> {
    /// Wait until every condition is satisfied, or return the first failure.
    ///
    /// Cancelling `cancel` stops all polling and returns
    /// [`WaitError::Cancelled`]. No condition task or reporter outlives this
    /// call, including when the returned future is dropped early.
    pub async fn execute(self, cancel: &CancellationToken) -> Result<(), WaitError> {
        if self.conditions.is_empty() {
            tracing::debug!("no conditions to wait on");
            return Ok(());
        }

        let span = tracing::info_span!("wait.execute", conditions = self.conditions.len());
        self.run(cancel.child_token()).instrument(span).await
    }

    async fn run(self, lifetime: CancellationToken) -> Result<(), WaitError> {
        // Cancels everything if this future is dropped mid-wait
        let _lifetime_guard = lifetime.clone().drop_guard();
        let start = Instant::now();
        let states = StateTable::new(&self.conditions);

        tracing::info!(
            count = self.conditions.len(),
            poll_interval = ?self.policy.poll_interval,
            timeout = ?self.policy.timeout,
            "waiting on resources"
        );

        let reporter = tokio::spawn(
            ProgressReporter {
                states: states.clone(),
                interval: self.policy.poll_interval,
                cancel: lifetime.clone(),
                sink: self.progress,
            }
            .run()
            .in_current_span(),
        );

        let mut tasks = JoinSet::new();
        let mut owners = HashMap::new();
        for (index, condition) in self.conditions.into_iter().enumerate() {
            let span = tracing::debug_span!("wait.condition", resource = %condition.resource);
            let resource = condition.resource.clone();
            let task = ConditionTask {
                provider: self.provider.clone(),
                condition,
                index,
                policy: self.policy,
                states: states.clone(),
                cancel: lifetime.clone(),
            };
            let handle = tasks.spawn(task.run().instrument(span));
            owners.insert(handle.id(), resource);
        }

        let mut failure = None;
        while let Some(joined) = tasks.join_next().await {
            let result = joined.unwrap_or_else(|e| {
                Err(WaitError::TaskAborted {
                    resource: owners.get(&e.id()).cloned(),
                    message: e.to_string(),
                })
            });
            if let Err(e) = result {
                failure = Some(e);
                break;
            }
        }

        lifetime.cancel();
        tasks.shutdown().await;
        if let Err(e) = reporter.await {
            tracing::warn!(error = %e, "progress reporter ended abnormally");
        }

        let elapsed_ms = start.elapsed().as_millis() as u64;
        match failure {
            None => {
                tracing::info!(elapsed_ms, "all resources reached the required condition/phase");
                Ok(())
            }
            Some(e) => {
                tracing::warn!(elapsed_ms, error = %e, "wait failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
