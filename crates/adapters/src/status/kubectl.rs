// SPDX-License-Identifier: MIT

//! kubectl-backed pod status provider

use super::{StatusError, StatusProvider};
use async_trait::async_trait;
use heph_core::{ResourceRef, ResourceStatus, StatusCondition};
use serde::Deserialize;
use std::path::PathBuf;
use tokio::process::Command;

/// Printed when the API server has no such pod. Client-side errors (an
/// unknown context, say) also mention "not found" and stay fatal.
const NOT_FOUND_MARKER: &str = "Error from server (NotFound)";

/// Queries pod status by shelling out to `kubectl get pod -o json`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KubectlStatusProvider {
    binary: PathBuf,
    kubeconfig: Option<PathBuf>,
    context: Option<String>,
}

impl Default for KubectlStatusProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl KubectlStatusProvider {
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from("kubectl"),
            kubeconfig: None,
            context: None,
        }
    }

    /// Use a specific kubectl binary instead of the one on `PATH`
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn with_kubeconfig(mut self, kubeconfig: impl Into<PathBuf>) -> Self {
        self.kubeconfig = Some(kubeconfig.into());
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    fn command_args(&self, resource: &ResourceRef) -> Vec<String> {
        let mut args = vec![
            "get".to_string(),
            "pod".to_string(),
            resource.name.clone(),
            "--namespace".to_string(),
            resource.namespace.clone(),
            "--output".to_string(),
            "json".to_string(),
        ];
        if let Some(kubeconfig) = &self.kubeconfig {
            args.push("--kubeconfig".to_string());
            args.push(kubeconfig.display().to_string());
        }
        if let Some(context) = &self.context {
            args.push("--context".to_string());
            args.push(context.clone());
        }
        args
    }
}

#[async_trait]
impl StatusProvider for KubectlStatusProvider {
    async fn get_status(&self, resource: &ResourceRef) -> Result<ResourceStatus, StatusError> {
        let output = Command::new(&self.binary)
            .args(self.command_args(resource))
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                StatusError::CommandFailed(format!("{}: {}", self.binary.display(), e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.contains(NOT_FOUND_MARKER) {
                return Err(StatusError::NotFound(resource.clone()));
            }
            return Err(StatusError::CommandFailed(stderr.trim().to_string()));
        }

        parse_pod_status(&output.stdout)
    }
}

#[derive(Deserialize)]
struct PodJson {
    #[serde(default)]
    status: PodStatusJson,
}

#[derive(Default, Deserialize)]
struct PodStatusJson {
    phase: Option<String>,
    #[serde(default)]
    conditions: Vec<PodConditionJson>,
}

#[derive(Deserialize)]
struct PodConditionJson {
    #[serde(rename = "type")]
    condition_type: String,
    status: String,
}

/// Parse `kubectl get pod -o json` output.
///
/// Conditions whose status is neither `True` nor `False` are dropped.
pub(crate) fn parse_pod_status(json: &[u8]) -> Result<ResourceStatus, StatusError> {
    let pod: PodJson =
        serde_json::from_slice(json).map_err(|e| StatusError::Malformed(e.to_string()))?;

    let conditions = pod
        .status
        .conditions
        .into_iter()
        .filter_map(|c| {
            let status = match c.status.as_str() {
                "True" => true,
                "False" => false,
                _ => return None,
            };
            Some(StatusCondition::new(c.condition_type, status))
        })
        .collect();

    Ok(ResourceStatus {
        phase: pod.status.phase,
        conditions,
    })
}

#[cfg(test)]
#[path = "kubectl_tests.rs"]
mod tests;
