// SPDX-License-Identifier: MIT

//! Pod readiness shortcuts

use crate::error::WaitError;
use crate::waiter::Waiter;
use heph_adapters::StatusProvider;
use heph_core::status::CONDITION_READY;
use heph_core::ResourceRef;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Poll interval used by the readiness shortcuts
pub const READY_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Timeouts shorter than [`READY_POLL_INTERVAL`] poll once per timeout instead
fn ready_interval(timeout: Duration) -> Duration {
    READY_POLL_INTERVAL.min(timeout)
}

/// Wait for one pod to report `Ready`, polling every second
pub async fn wait_for_pod_ready<P: StatusProvider>(
    provider: P,
    cancel: &CancellationToken,
    pod: ResourceRef,
    timeout: Duration,
) -> Result<(), WaitError> {
    Waiter::new(provider)
        .with_condition_wait(pod, CONDITION_READY)
        .with_poll_interval(ready_interval(timeout))
        .with_timeout(timeout)
        .execute(cancel)
        .await
}

/// Wait for every named pod in `namespace` to report `Ready`.
///
/// A zero timeout is a configuration error.
pub async fn wait_for_pods_ready<P, I, S>(
    provider: P,
    cancel: &CancellationToken,
    namespace: &str,
    pods: I,
    timeout: Duration,
) -> Result<(), WaitError>
where
    P: StatusProvider,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let pods = pods
        .into_iter()
        .map(|name| ResourceRef::new(namespace, name));

    Waiter::new(provider)
        .with_condition_wait_many(pods, CONDITION_READY)
        .with_poll_interval(ready_interval(timeout))
        .with_timeout(timeout)
        .execute(cancel)
        .await
}

#[cfg(test)]
#[path = "pods_tests.rs"]
mod tests;
