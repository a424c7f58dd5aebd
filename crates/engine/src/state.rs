// SPDX-License-Identifier: MIT

//! Shared table of per-condition runtime state.
//!
//! Each entry is written only by its own condition task and read by the
//! progress reporter. One mutex guards the whole table so snapshots are
//! consistent across entries.

use heph_core::{ConditionState, ResourceRef, WaitCondition};
use std::sync::{Arc, Mutex};

#[derive(Debug)]
struct Entry {
    resource: ResourceRef,
    state: ConditionState,
}

#[derive(Clone, Debug)]
pub(crate) struct StateTable {
    entries: Arc<Mutex<Vec<Entry>>>,
}

impl StateTable {
    pub(crate) fn new(conditions: &[WaitCondition]) -> Self {
        let entries = conditions
            .iter()
            .map(|c| Entry {
                resource: c.resource.clone(),
                state: ConditionState::Pending,
            })
            .collect();
        Self {
            entries: Arc::new(Mutex::new(entries)),
        }
    }

    /// Move a pending entry to `state`.
    ///
    /// Returns false without changing anything if the entry is already
    /// terminal or does not exist.
    pub(crate) fn transition(&self, index: usize, state: ConditionState) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get_mut(index) {
            Some(entry) if !entry.state.is_terminal() => {
                entry.state = state;
                true
            }
            _ => false,
        }
    }

    #[cfg(test)]
    pub(crate) fn state(&self, index: usize) -> Option<ConditionState> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(index)
            .map(|entry| entry.state.clone())
    }

    /// Resources still pending, in declaration order
    pub(crate) fn pending(&self) -> Vec<ResourceRef> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|entry| entry.state.is_pending())
            .map(|entry| entry.resource.clone())
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
