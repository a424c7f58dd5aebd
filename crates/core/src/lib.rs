// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! heph-core: data model for the heph readiness waiter
//!
//! This crate provides:
//! - Resource identity and point-in-time status snapshots
//! - The predicate evaluator deciding whether a snapshot satisfies a wait
//! - Per-condition runtime state
//! - Poll policy configuration

pub mod condition;
pub mod config;
pub mod predicate;
pub mod resource;
pub mod status;

pub use condition::{ConditionState, WaitCondition};
pub use config::{ConfigError, PollPolicy};
pub use predicate::Predicate;
pub use resource::{ParseResourceError, ResourceRef};
pub use status::{ResourceStatus, StatusCondition};
