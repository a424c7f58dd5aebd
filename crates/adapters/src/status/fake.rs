// SPDX-License-Identifier: MIT

//! Fake status provider for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{StatusError, StatusProvider};
use async_trait::async_trait;
use heph_core::{ResourceRef, ResourceStatus};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Recorded status call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusCall {
    GetStatus { resource: ResourceRef },
}

type Response = Result<ResourceStatus, StatusError>;

/// Fake status provider with scripted per-resource responses.
///
/// Responses for a resource are replayed in order; the last one repeats
/// forever. A resource with nothing scripted reports `NotFound`.
#[derive(Clone, Default)]
pub struct FakeStatusProvider {
    responses: Arc<Mutex<HashMap<ResourceRef, VecDeque<Response>>>>,
    latency: Arc<Mutex<Option<Duration>>>,
    calls: Arc<Mutex<Vec<StatusCall>>>,
}

impl FakeStatusProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a status snapshot for a resource
    pub fn push_status(&self, resource: &ResourceRef, status: ResourceStatus) -> &Self {
        self.push(resource, Ok(status))
    }

    /// Queue `count` copies of a status snapshot
    pub fn push_status_times(
        &self,
        resource: &ResourceRef,
        status: ResourceStatus,
        count: usize,
    ) -> &Self {
        for _ in 0..count {
            self.push(resource, Ok(status.clone()));
        }
        self
    }

    /// Queue an error for a resource
    pub fn push_error(&self, resource: &ResourceRef, error: StatusError) -> &Self {
        self.push(resource, Err(error))
    }

    /// Queue a not-found response for a resource
    pub fn push_not_found(&self, resource: &ResourceRef) -> &Self {
        self.push(resource, Err(StatusError::NotFound(resource.clone())))
    }

    fn push(&self, resource: &ResourceRef, response: Response) -> &Self {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(resource.clone())
            .or_default()
            .push_back(response);
        self
    }

    /// Delay every query by `latency`
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap_or_else(|e| e.into_inner()) = Some(latency);
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<StatusCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of queries made for one resource
    pub fn call_count(&self, resource: &ResourceRef) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|StatusCall::GetStatus { resource: r }| r == resource)
            .count()
    }

    fn next_response(&self, resource: &ResourceRef) -> Response {
        let mut responses = self.responses.lock().unwrap_or_else(|e| e.into_inner());
        let Some(queue) = responses.get_mut(resource) else {
            return Err(StatusError::NotFound(resource.clone()));
        };
        if queue.len() > 1 {
            if let Some(response) = queue.pop_front() {
                return response;
            }
        }
        queue
            .front()
            .cloned()
            .unwrap_or_else(|| Err(StatusError::NotFound(resource.clone())))
    }
}

#[async_trait]
impl StatusProvider for FakeStatusProvider {
    async fn get_status(&self, resource: &ResourceRef) -> Result<ResourceStatus, StatusError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(StatusCall::GetStatus {
                resource: resource.clone(),
            });

        let latency = *self.latency.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        self.next_response(resource)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
