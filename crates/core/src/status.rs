// SPDX-License-Identifier: MIT

//! Point-in-time resource status

use serde::{Deserialize, Serialize};

/// Condition reported once a pod can serve traffic
pub const CONDITION_READY: &str = "Ready";

pub const PHASE_PENDING: &str = "Pending";
pub const PHASE_RUNNING: &str = "Running";
pub const PHASE_SUCCEEDED: &str = "Succeeded";
pub const PHASE_FAILED: &str = "Failed";
pub const PHASE_UNKNOWN: &str = "Unknown";

/// A named boolean status flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCondition {
    pub condition_type: String,
    pub status: bool,
}

impl StatusCondition {
    pub fn new(condition_type: impl Into<String>, status: bool) -> Self {
        Self {
            condition_type: condition_type.into(),
            status,
        }
    }
}

/// Snapshot of a resource's status as returned by a status provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceStatus {
    /// Coarse lifecycle phase, if the resource reports one
    pub phase: Option<String>,
    /// Conditions in the order the provider reported them
    pub conditions: Vec<StatusCondition>,
}

impl ResourceStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_phase(mut self, phase: impl Into<String>) -> Self {
        self.phase = Some(phase.into());
        self
    }

    pub fn with_condition(mut self, condition_type: impl Into<String>, status: bool) -> Self {
        self.conditions
            .push(StatusCondition::new(condition_type, status));
        self
    }

    /// Value of the first condition with the given type
    pub fn condition(&self, condition_type: &str) -> Option<bool> {
        self.conditions
            .iter()
            .find(|c| c.condition_type == condition_type)
            .map(|c| c.status)
    }
}
