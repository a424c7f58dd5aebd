// SPDX-License-Identifier: MIT

//! Resource status providers

mod kubectl;

pub use kubectl::KubectlStatusProvider;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeStatusProvider, StatusCall};

use async_trait::async_trait;
use heph_core::{ResourceRef, ResourceStatus};
use thiserror::Error;

/// Errors from status queries
#[derive(Debug, Clone, Error)]
pub enum StatusError {
    #[error("resource not found: {0}")]
    NotFound(ResourceRef),
    #[error("command failed: {0}")]
    CommandFailed(String),
    #[error("malformed status: {0}")]
    Malformed(String),
}

impl StatusError {
    /// Whether the resource is absent (it may not have been created yet).
    ///
    /// Every other error is an unrecoverable query failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StatusError::NotFound(_))
    }
}

/// Supplies point-in-time status for a named resource.
///
/// Implementations must be safe to call concurrently. Dropping the returned
/// future abandons the query; implementations must not leave work running
/// past that point.
#[async_trait]
pub trait StatusProvider: Clone + Send + Sync + 'static {
    /// Fetch the current status of a resource
    async fn get_status(&self, resource: &ResourceRef) -> Result<ResourceStatus, StatusError>;
}
