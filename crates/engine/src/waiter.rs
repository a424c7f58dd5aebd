// SPDX-License-Identifier: MIT

//! Wait set builder.
//!
//! Declarations accumulate with no side effects. `build` validates the poll
//! policy and freezes the declarations into a [`WaitPlan`]; nothing touches
//! the status provider until the plan is executed.

use crate::error::WaitError;
use crate::progress::ProgressReport;
use heph_adapters::StatusProvider;
use heph_core::{ConfigError, PollPolicy, Predicate, ResourceRef, WaitCondition};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Fluent builder for a set of resource wait conditions
#[must_use]
pub struct Waiter<P> {
    provider: P,
    conditions: Vec<WaitCondition>,
    policy: PollPolicy,
    progress: Option<mpsc::Sender<ProgressReport>>,
}

impl<P: StatusProvider> Waiter<P> {
    /// Start an empty wait set with the default poll policy
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            conditions: Vec::new(),
            policy: PollPolicy::default(),
            progress: None,
        }
    }

    /// Wait for an arbitrary condition
    pub fn with_wait(mut self, condition: WaitCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Wait for `resource` to report `condition_type` as true
    pub fn with_condition_wait(
        self,
        resource: ResourceRef,
        condition_type: impl Into<String>,
    ) -> Self {
        self.with_wait(WaitCondition::new(
            resource,
            Predicate::condition(condition_type),
        ))
    }

    /// Wait for every resource to report `condition_type` as true
    pub fn with_condition_wait_many(
        mut self,
        resources: impl IntoIterator<Item = ResourceRef>,
        condition_type: impl Into<String>,
    ) -> Self {
        let predicate = Predicate::condition(condition_type);
        self.conditions.extend(
            resources
                .into_iter()
                .map(|r| WaitCondition::new(r, predicate.clone())),
        );
        self
    }

    /// Wait for `resource` to reach `phase`
    pub fn with_phase_wait(self, resource: ResourceRef, phase: impl Into<String>) -> Self {
        self.with_wait(WaitCondition::new(resource, Predicate::phase(phase)))
    }

    /// Wait for every resource to reach `phase`
    pub fn with_phase_wait_many(
        mut self,
        resources: impl IntoIterator<Item = ResourceRef>,
        phase: impl Into<String>,
    ) -> Self {
        let predicate = Predicate::phase(phase);
        self.conditions.extend(
            resources
                .into_iter()
                .map(|r| WaitCondition::new(r, predicate.clone())),
        );
        self
    }

    /// Delay between polls of each condition; must be non-zero
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.policy.poll_interval = interval;
        self
    }

    /// Per-condition deadline; must be at least the poll interval
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.policy.timeout = timeout;
        self
    }

    /// Replace both poll settings at once
    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Also deliver progress snapshots to `sink`. Reports that do not fit
    /// in the channel are dropped.
    pub fn with_progress(mut self, sink: mpsc::Sender<ProgressReport>) -> Self {
        self.progress = Some(sink);
        self
    }

    /// Validate the poll policy and freeze the declared conditions
    pub fn build(self) -> Result<WaitPlan<P>, ConfigError> {
        self.policy.validate()?;
        Ok(WaitPlan {
            provider: self.provider,
            conditions: self.conditions,
            policy: self.policy,
            progress: self.progress,
        })
    }

    /// Build and execute in one step.
    ///
    /// Configuration errors are returned before any status query is made.
    pub async fn execute(self, cancel: &CancellationToken) -> Result<(), WaitError> {
        self.build()?.execute(cancel).await
    }
}

/// A frozen, validated wait set. Executed at most once.
#[must_use]
pub struct WaitPlan<P> {
    pub(crate) provider: P,
    pub(crate) conditions: Vec<WaitCondition>,
    pub(crate) policy: PollPolicy,
    pub(crate) progress: Option<mpsc::Sender<ProgressReport>>,
}

impl<P> WaitPlan<P> {
    pub fn conditions(&self) -> &[WaitCondition] {
        &self.conditions
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

#[cfg(test)]
#[path = "waiter_tests.rs"]
mod tests;
