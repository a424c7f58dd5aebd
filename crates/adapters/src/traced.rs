// SPDX-License-Identifier: MIT

//! Traced adapter wrappers for consistent observability

use crate::status::{StatusError, StatusProvider};
use async_trait::async_trait;
use heph_core::{ResourceRef, ResourceStatus};
use tracing::Instrument;

/// Wrapper that adds tracing to any StatusProvider
#[derive(Clone)]
pub struct TracedStatusProvider<P> {
    inner: P,
}

impl<P> TracedStatusProvider<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<P: StatusProvider> StatusProvider for TracedStatusProvider<P> {
    async fn get_status(&self, resource: &ResourceRef) -> Result<ResourceStatus, StatusError> {
        let span = tracing::info_span!(
            "status.get",
            namespace = %resource.namespace,
            name = %resource.name
        );

        async {
            tracing::trace!("querying");

            let start = std::time::Instant::now();
            let result = self.inner.get_status(resource).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(status) => tracing::debug!(
                    elapsed_ms,
                    phase = status.phase.as_deref().unwrap_or("-"),
                    conditions = status.conditions.len(),
                    "status received"
                ),
                // Expected while a resource is still being created
                Err(e) if e.is_not_found() => {
                    tracing::debug!(elapsed_ms, "resource not found yet")
                }
                Err(e) => tracing::warn!(elapsed_ms, error = %e, "status query failed"),
            }

            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
