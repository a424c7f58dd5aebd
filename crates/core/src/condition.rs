// SPDX-License-Identifier: MIT

//! Wait conditions and their runtime state

use crate::predicate::Predicate;
use crate::resource::ResourceRef;
use crate::status::ResourceStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A resource paired with the state it must reach
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WaitCondition {
    pub resource: ResourceRef,
    pub predicate: Predicate,
}

impl WaitCondition {
    pub fn new(resource: ResourceRef, predicate: Predicate) -> Self {
        Self {
            resource,
            predicate,
        }
    }

    pub fn is_satisfied_by(&self, status: &ResourceStatus) -> bool {
        self.predicate.is_satisfied(status)
    }
}

impl fmt::Display for WaitCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.resource, self.predicate)
    }
}

/// Runtime state of one wait condition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConditionState {
    #[default]
    Pending,
    Satisfied,
    Failed(String),
    TimedOut,
}

impl ConditionState {
    pub fn is_pending(&self) -> bool {
        matches!(self, ConditionState::Pending)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_pending()
    }
}

impl fmt::Display for ConditionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionState::Pending => write!(f, "pending"),
            ConditionState::Satisfied => write!(f, "satisfied"),
            ConditionState::Failed(reason) => write!(f, "failed: {}", reason),
            ConditionState::TimedOut => write!(f, "timed out"),
        }
    }
}

#[cfg(test)]
#[path = "condition_tests.rs"]
mod tests;
