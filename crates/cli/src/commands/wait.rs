// SPDX-License-Identifier: MIT

//! `heph wait [RESOURCES]...` - Block until resources are ready

use crate::error::HephError;
use anyhow::{Context, Result};
use clap::Args;
use heph_adapters::{KubectlStatusProvider, TracedStatusProvider};
use heph_core::resource::DEFAULT_NAMESPACE;
use heph_core::status::CONDITION_READY;
use heph_core::{PollPolicy, Predicate, ResourceRef, WaitCondition};
use heph_engine::{CancellationToken, Waiter};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct WaitArgs {
    /// Pods to wait on, as NAME or NAMESPACE/NAME
    pub resources: Vec<String>,

    /// Namespace for resources given without one
    #[arg(short, long, default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,

    /// Status condition that must be true [default: Ready]
    #[arg(long, conflicts_with = "phase")]
    pub condition: Option<String>,

    /// Lifecycle phase to reach (e.g. Running, Succeeded)
    #[arg(long)]
    pub phase: Option<String>,

    /// Time between status queries (e.g. 5s, 500ms)
    #[arg(long, value_parser = humantime::parse_duration)]
    pub poll_interval: Option<Duration>,

    /// Deadline for each resource (e.g. 2m)
    #[arg(long, value_parser = humantime::parse_duration)]
    pub timeout: Option<Duration>,

    /// Config file with a [wait] table [default: ~/.config/heph/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// kubeconfig passed through to kubectl
    #[arg(long)]
    pub kubeconfig: Option<PathBuf>,

    /// kubeconfig context passed through to kubectl
    #[arg(long)]
    pub context: Option<String>,

    /// kubectl binary to run
    #[arg(long, default_value = "kubectl")]
    pub kubectl: PathBuf,
}

impl WaitArgs {
    fn predicate(&self) -> Predicate {
        match (&self.phase, &self.condition) {
            (Some(phase), _) => Predicate::phase(phase.clone()),
            (None, Some(condition)) => Predicate::condition(condition.clone()),
            (None, None) => Predicate::condition(CONDITION_READY),
        }
    }

    fn conditions(&self) -> Result<Vec<WaitCondition>> {
        let predicate = self.predicate();
        self.resources
            .iter()
            .map(|s| -> Result<WaitCondition> {
                let resource = ResourceRef::parse_in(&self.namespace, s)?;
                Ok(WaitCondition::new(resource, predicate.clone()))
            })
            .collect()
    }

    fn provider(&self) -> KubectlStatusProvider {
        let mut provider = KubectlStatusProvider::new().with_binary(&self.kubectl);
        if let Some(kubeconfig) = &self.kubeconfig {
            provider = provider.with_kubeconfig(kubeconfig);
        }
        if let Some(context) = &self.context {
            provider = provider.with_context(context);
        }
        provider
    }
}

/// Config file consulted when `--config` is not given
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("heph").join("config.toml"))
}

/// Resolve the poll policy: explicit config file, else the default file if
/// present, else built-in defaults; then command-line overrides.
///
/// The merged policy is validated by [`Waiter::build`], not here.
pub fn resolve_policy(args: &WaitArgs, default_path: Option<PathBuf>) -> Result<PollPolicy> {
    let mut policy = match (&args.config, default_path) {
        (Some(path), _) => PollPolicy::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        (None, Some(path)) if path.is_file() => PollPolicy::load(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        _ => PollPolicy::default(),
    };

    if let Some(interval) = args.poll_interval {
        policy = policy.with_poll_interval(interval);
    }
    if let Some(timeout) = args.timeout {
        policy = policy.with_timeout(timeout);
    }
    Ok(policy)
}

pub async fn handle(args: WaitArgs) -> Result<()> {
    let policy = resolve_policy(&args, default_config_path())?;
    let conditions = args.conditions()?;
    let provider = TracedStatusProvider::new(args.provider());
    tracing::debug!(
        resources = conditions.len(),
        poll_interval = ?policy.poll_interval,
        timeout = ?policy.timeout,
        "resolved wait settings"
    );

    let cancel = CancellationToken::new();
    let token = cancel.clone();
    ctrlc::set_handler(move || {
        eprintln!("\nCancelling wait...");
        token.cancel();
    })?;

    let waiter = conditions
        .into_iter()
        .fold(Waiter::new(provider), Waiter::with_wait)
        .with_policy(policy);

    waiter.execute(&cancel).await.map_err(HephError::from)?;
    Ok(())
}

#[cfg(test)]
#[path = "wait_tests.rs"]
mod tests;
