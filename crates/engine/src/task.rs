// SPDX-License-Identifier: MIT

//! Condition task: drives one wait condition to a terminal state

use crate::error::WaitError;
use crate::state::StateTable;
use heph_adapters::StatusProvider;
use heph_core::{ConditionState, PollPolicy, WaitCondition};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

pub(crate) struct ConditionTask<P> {
    pub(crate) provider: P,
    pub(crate) condition: WaitCondition,
    pub(crate) index: usize,
    pub(crate) policy: PollPolicy,
    pub(crate) states: StateTable,
    pub(crate) cancel: CancellationToken,
}

impl<P: StatusProvider> ConditionTask<P> {
    /// Poll until the predicate holds, a query fails, the deadline passes,
    /// or the shared lifetime is cancelled.
    ///
    /// The first poll happens immediately. NotFound keeps the condition
    /// pending; any other query error is fatal and not retried. A query
    /// still in flight at the deadline is abandoned.
    pub(crate) async fn run(self) -> Result<(), WaitError> {
        let deadline = Instant::now() + self.policy.timeout;
        let resource = &self.condition.resource;

        loop {
            let polled = tokio::select! {
                biased;
                () = self.cancel.cancelled() => return Err(WaitError::Cancelled),
                polled = tokio::time::timeout_at(deadline, self.provider.get_status(resource)) => polled,
            };

            match polled {
                Err(_elapsed) => return Err(self.timed_out()),
                Ok(Ok(status)) => {
                    if self.condition.is_satisfied_by(&status) {
                        self.states.transition(self.index, ConditionState::Satisfied);
                        tracing::info!(resource = %resource, "condition satisfied");
                        return Ok(());
                    }
                    tracing::trace!(resource = %resource, phase = ?status.phase, "not yet satisfied");
                }
                Ok(Err(e)) if e.is_not_found() => {
                    tracing::debug!(resource = %resource, "resource not found, will retry");
                }
                Ok(Err(e)) => {
                    self.states
                        .transition(self.index, ConditionState::Failed(e.to_string()));
                    tracing::error!(resource = %resource, error = %e, "status query failed");
                    return Err(WaitError::Query {
                        resource: resource.clone(),
                        source: e,
                    });
                }
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(self.timed_out());
            }
            let next_poll = (now + self.policy.poll_interval).min(deadline);

            tokio::select! {
                biased;
                () = self.cancel.cancelled() => return Err(WaitError::Cancelled),
                () = tokio::time::sleep_until(next_poll) => {}
            }
        }
    }

    fn timed_out(&self) -> WaitError {
        self.states.transition(self.index, ConditionState::TimedOut);
        tracing::warn!(
            resource = %self.condition.resource,
            predicate = %self.condition.predicate,
            timeout = ?self.policy.timeout,
            "timed out waiting for condition"
        );
        WaitError::Timeout {
            resource: self.condition.resource.clone(),
            predicate: self.condition.predicate.clone(),
            timeout: self.policy.timeout,
        }
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
