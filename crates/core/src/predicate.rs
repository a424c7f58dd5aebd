// SPDX-License-Identifier: MIT

//! Target-state predicates and their evaluator

use crate::status::ResourceStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The state a wait condition is waiting for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Predicate {
    /// A named condition reports the expected value
    ConditionEquals {
        condition_type: String,
        expected: bool,
    },
    /// The lifecycle phase matches exactly
    PhaseEquals { phase: String },
}

impl Predicate {
    /// Wait for `condition_type` to report true
    pub fn condition(condition_type: impl Into<String>) -> Self {
        Predicate::ConditionEquals {
            condition_type: condition_type.into(),
            expected: true,
        }
    }

    pub fn phase(phase: impl Into<String>) -> Self {
        Predicate::PhaseEquals {
            phase: phase.into(),
        }
    }

    /// Whether `status` satisfies this predicate.
    ///
    /// Phases compare by exact string equality: `Running` never matches
    /// `Succeeded` even though both are past `Pending`.
    pub fn is_satisfied(&self, status: &ResourceStatus) -> bool {
        match self {
            Predicate::ConditionEquals {
                condition_type,
                expected,
            } => status
                .conditions
                .iter()
                .any(|c| c.condition_type == *condition_type && c.status == *expected),
            Predicate::PhaseEquals { phase } => status.phase.as_deref() == Some(phase.as_str()),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::ConditionEquals {
                condition_type,
                expected,
            } => write!(f, "condition {}={}", condition_type, expected),
            Predicate::PhaseEquals { phase } => write!(f, "phase {}", phase),
        }
    }
}

#[cfg(test)]
#[path = "predicate_tests.rs"]
mod tests;
