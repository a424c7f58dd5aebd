// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! heph wait engine
//!
//! Blocks until a set of resources reach their target condition or phase,
//! one polling task per resource, failing fast on the first unrecoverable
//! error or timeout.

mod coordinator;
mod error;
mod pods;
mod progress;
mod state;
mod task;
mod waiter;

pub use error::WaitError;
pub use pods::{wait_for_pod_ready, wait_for_pods_ready, READY_POLL_INTERVAL};
pub use progress::ProgressReport;
pub use waiter::{WaitPlan, Waiter};

pub use tokio_util::sync::CancellationToken;
