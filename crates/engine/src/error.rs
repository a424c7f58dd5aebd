// SPDX-License-Identifier: MIT

//! Error types for waiting on resources

use heph_adapters::StatusError;
use heph_core::{ConfigError, Predicate, ResourceRef};
use std::time::Duration;
use thiserror::Error;

/// Errors that end a wait. Exactly one is surfaced per wait: the first
/// terminal failure observed.
#[derive(Debug, Error)]
pub enum WaitError {
    #[error("invalid wait configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("status query for {resource} failed: {source}")]
    Query {
        resource: ResourceRef,
        #[source]
        source: StatusError,
    },
    #[error("timed out after {timeout:?} waiting for {resource} to reach {predicate}")]
    Timeout {
        resource: ResourceRef,
        predicate: Predicate,
        timeout: Duration,
    },
    #[error("wait cancelled")]
    Cancelled,
    /// A condition task panicked or was aborted before reaching a state
    #[error("condition task for {} aborted: {message}", describe(.resource))]
    TaskAborted {
        resource: Option<ResourceRef>,
        message: String,
    },
}

fn describe(resource: &Option<ResourceRef>) -> String {
    resource
        .as_ref()
        .map_or_else(|| "unknown resource".to_string(), ToString::to_string)
}

impl WaitError {
    /// The resource whose condition caused the failure, if any
    pub fn resource(&self) -> Option<&ResourceRef> {
        match self {
            WaitError::Query { resource, .. } | WaitError::Timeout { resource, .. } => {
                Some(resource)
            }
            WaitError::TaskAborted { resource, .. } => resource.as_ref(),
            WaitError::Config(_) | WaitError::Cancelled => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, WaitError::Timeout { .. })
    }
}
