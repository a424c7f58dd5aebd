// SPDX-License-Identifier: MIT

use super::*;
use crate::progress::ProgressReport;
use crate::waiter::Waiter;
use heph_adapters::{FakeStatusProvider, StatusError};
use heph_core::{ResourceRef, ResourceStatus};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::fmt::MakeWriter;

fn pod(name: &str) -> ResourceRef {
    ResourceRef::new("default", name)
}

fn ready(value: bool) -> ResourceStatus {
    ResourceStatus::new().with_condition("Ready", value)
}

fn assert_between(elapsed: Duration, min_ms: u64, max_ms: u64) {
    assert!(
        elapsed >= Duration::from_millis(min_ms) && elapsed < Duration::from_millis(max_ms),
        "elapsed {:?} not in [{}ms, {}ms)",
        elapsed,
        min_ms,
        max_ms
    );
}

// =============================================================================
// Outcome scenarios
// =============================================================================

#[tokio::test(start_paused = true)]
async fn empty_wait_set_succeeds_without_querying() {
    let provider = FakeStatusProvider::new();
    let start = Instant::now();

    Waiter::new(provider.clone())
        .execute(&CancellationToken::new())
        .await
        .unwrap();

    assert!(provider.calls().is_empty());
    assert!(start.elapsed() < Duration::from_millis(1));
}

#[tokio::test(start_paused = true)]
async fn two_resources_become_ready_after_two_polls() {
    let provider = FakeStatusProvider::new();
    for name in ["postgres-primary-0", "postgres-read-0"] {
        provider
            .push_status_times(&pod(name), ready(false), 2)
            .push_status(&pod(name), ready(true));
    }

    let start = Instant::now();
    Waiter::new(provider.clone())
        .with_condition_wait_many(vec![pod("postgres-primary-0"), pod("postgres-read-0")], "Ready")
        .with_poll_interval(Duration::from_millis(100))
        .with_timeout(Duration::from_secs(5))
        .execute(&CancellationToken::new())
        .await
        .unwrap();

    assert_between(start.elapsed(), 200, 300);
    assert_eq!(provider.call_count(&pod("postgres-primary-0")), 3);
    assert_eq!(provider.call_count(&pod("postgres-read-0")), 3);
}

#[tokio::test(start_paused = true)]
async fn phase_wait_on_missing_resource_times_out() {
    let provider = FakeStatusProvider::new();

    let start = Instant::now();
    let err = Waiter::new(provider.clone())
        .with_phase_wait(pod("migrate-0"), "Running")
        .with_poll_interval(Duration::from_millis(50))
        .with_timeout(Duration::from_millis(200))
        .execute(&CancellationToken::new())
        .await
        .unwrap_err();

    assert!(err.is_timeout(), "expected timeout, got {:?}", err);
    assert_eq!(err.resource(), Some(&pod("migrate-0")));
    assert!(err.to_string().contains("default/migrate-0"));
    assert_between(start.elapsed(), 200, 250);
}

#[tokio::test(start_paused = true)]
async fn condition_wait_on_missing_resource_also_retries() {
    let provider = FakeStatusProvider::new();
    provider
        .push_not_found(&pod("web-0"))
        .push_status(&pod("web-0"), ready(true));

    Waiter::new(provider.clone())
        .with_condition_wait(pod("web-0"), "Ready")
        .with_poll_interval(Duration::from_millis(50))
        .with_timeout(Duration::from_secs(1))
        .execute(&CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(provider.call_count(&pod("web-0")), 2);
}

#[tokio::test(start_paused = true)]
async fn first_query_error_fails_fast_and_stops_siblings() {
    let provider = FakeStatusProvider::new();
    provider.push_error(&pod("a"), StatusError::CommandFailed("forbidden".into()));
    provider
        .push_status_times(&pod("b"), ready(false), 2)
        .push_status(&pod("b"), ready(true));

    let start = Instant::now();
    let err = Waiter::new(provider.clone())
        .with_condition_wait(pod("a"), "Ready")
        .with_condition_wait(pod("b"), "Ready")
        .with_poll_interval(Duration::from_millis(100))
        .with_timeout(Duration::from_secs(5))
        .execute(&CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, WaitError::Query { .. }), "got {:?}", err);
    assert_eq!(err.resource(), Some(&pod("a")));
    assert!(start.elapsed() < Duration::from_millis(100));

    let b_calls = provider.call_count(&pod("b"));
    assert!(b_calls <= 1);
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(provider.call_count(&pod("b")), b_calls);
    assert_eq!(provider.call_count(&pod("a")), 1);
}

#[tokio::test(start_paused = true)]
async fn timeout_on_one_resource_cancels_the_rest() {
    let provider = FakeStatusProvider::new();
    provider.push_status(&pod("slow"), ready(false));
    provider.push_status(&pod("never"), ResourceStatus::new().with_phase("Pending"));

    let err = Waiter::new(provider.clone())
        .with_condition_wait(pod("slow"), "Ready")
        .with_phase_wait(pod("never"), "Running")
        .with_poll_interval(Duration::from_millis(100))
        .with_timeout(Duration::from_millis(300))
        .execute(&CancellationToken::new())
        .await
        .unwrap_err();

    assert!(err.is_timeout());
    let calls = provider.calls().len();
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(provider.calls().len(), calls);
}

#[tokio::test(start_paused = true)]
async fn satisfied_condition_is_never_polled_again() {
    let provider = FakeStatusProvider::new();
    // `fast` would regress if polled again
    provider
        .push_status(&pod("fast"), ready(true))
        .push_status(&pod("fast"), ready(false));
    provider
        .push_status_times(&pod("slow"), ready(false), 4)
        .push_status(&pod("slow"), ready(true));

    Waiter::new(provider.clone())
        .with_condition_wait_many(vec![pod("fast"), pod("slow")], "Ready")
        .with_poll_interval(Duration::from_millis(100))
        .with_timeout(Duration::from_secs(5))
        .execute(&CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(provider.call_count(&pod("fast")), 1);
    assert_eq!(provider.call_count(&pod("slow")), 5);
}

#[tokio::test(start_paused = true)]
async fn identical_declarations_yield_identical_outcomes() {
    async fn run_once() -> Result<(), String> {
        let provider = FakeStatusProvider::new();
        provider
            .push_status_times(&pod("a"), ResourceStatus::new().with_phase("Pending"), 3)
            .push_status(&pod("a"), ResourceStatus::new().with_phase("Running"));
        provider.push_not_found(&pod("b"));

        Waiter::new(provider)
            .with_phase_wait_many(vec![pod("a"), pod("b")], "Running")
            .with_poll_interval(Duration::from_millis(100))
            .with_timeout(Duration::from_millis(500))
            .execute(&CancellationToken::new())
            .await
            .map_err(|e| e.to_string())
    }

    let first = run_once().await;
    let second = run_once().await;
    assert!(first.is_err());
    assert_eq!(first, second);
}

/// Provider whose query panics for one resource and reports ready otherwise
#[derive(Clone)]
struct PanicsOn(ResourceRef);

#[async_trait::async_trait]
impl StatusProvider for PanicsOn {
    async fn get_status(&self, resource: &ResourceRef) -> Result<ResourceStatus, StatusError> {
        if *resource == self.0 {
            panic!("status decoder blew up");
        }
        Ok(ready(true))
    }
}

#[tokio::test(start_paused = true)]
async fn panicking_task_reports_its_resource() {
    let err = Waiter::new(PanicsOn(pod("broken-0")))
        .with_condition_wait_many(vec![pod("web-0"), pod("broken-0")], "Ready")
        .with_poll_interval(Duration::from_millis(100))
        .with_timeout(Duration::from_secs(1))
        .execute(&CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, WaitError::TaskAborted { .. }));
    assert_eq!(err.resource(), Some(&pod("broken-0")));
    assert!(err.to_string().contains("default/broken-0"));
}

// =============================================================================
// Cancellation
// =============================================================================

#[tokio::test(start_paused = true)]
async fn caller_cancellation_stops_wait() {
    let provider = FakeStatusProvider::new();
    let cancel = CancellationToken::new();

    let waiter = Waiter::new(provider.clone())
        .with_phase_wait_many(vec![pod("a"), pod("b")], "Running")
        .with_poll_interval(Duration::from_millis(100))
        .with_timeout(Duration::from_secs(60));
    let handle = tokio::spawn({
        let cancel = cancel.clone();
        async move { waiter.execute(&cancel).await }
    });

    tokio::time::sleep(Duration::from_millis(250)).await;
    let start = Instant::now();
    cancel.cancel();
    let err = handle.await.unwrap().unwrap_err();

    assert!(matches!(err, WaitError::Cancelled));
    assert!(start.elapsed() < Duration::from_millis(100));

    let calls = provider.calls().len();
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(provider.calls().len(), calls);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_wait_stops_polling() {
    let provider = FakeStatusProvider::new();
    let cancel = CancellationToken::new();
    let wait = Waiter::new(provider.clone())
        .with_phase_wait(pod("a"), "Running")
        .with_poll_interval(Duration::from_millis(100))
        .with_timeout(Duration::from_secs(60))
        .execute(&cancel);

    let result = tokio::time::timeout(Duration::from_millis(250), wait).await;
    assert!(result.is_err());

    let calls = provider.calls().len();
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(provider.calls().len(), calls);
}

// =============================================================================
// Progress reporting
// =============================================================================

#[tokio::test(start_paused = true)]
async fn progress_reports_shrink_as_resources_settle() {
    let provider = FakeStatusProvider::new();
    provider
        .push_status(&pod("a"), ready(false))
        .push_status(&pod("a"), ready(true));
    provider
        .push_status_times(&pod("b"), ready(false), 3)
        .push_status(&pod("b"), ready(true));

    let (tx, mut rx) = mpsc::channel(16);
    Waiter::new(provider)
        .with_condition_wait_many(vec![pod("a"), pod("b")], "Ready")
        .with_poll_interval(Duration::from_millis(100))
        .with_timeout(Duration::from_secs(5))
        .with_progress(tx)
        .execute(&CancellationToken::new())
        .await
        .unwrap();

    // All senders are gone once the wait returns
    let mut reports: Vec<ProgressReport> = Vec::new();
    while let Some(report) = rx.recv().await {
        reports.push(report);
    }

    assert!(!reports.is_empty());
    assert!(reports.iter().all(|r| r.total == 2));
    assert_eq!(reports.last().map(|r| r.pending.clone()), Some(vec![pod("b")]));
    for pair in reports.windows(2) {
        assert!(pair[0].pending.len() >= pair[1].pending.len());
    }
}

#[tokio::test(start_paused = true)]
async fn closed_progress_channel_does_not_affect_outcome() {
    let provider = FakeStatusProvider::new();
    provider
        .push_status_times(&pod("a"), ready(false), 3)
        .push_status(&pod("a"), ready(true));

    let (tx, rx) = mpsc::channel(1);
    drop(rx);

    Waiter::new(provider)
        .with_condition_wait(pod("a"), "Ready")
        .with_poll_interval(Duration::from_millis(100))
        .with_timeout(Duration::from_secs(5))
        .with_progress(tx)
        .execute(&CancellationToken::new())
        .await
        .unwrap();
}

/// A writer that captures log output for testing
#[derive(Clone, Default)]
struct CapturedLogs {
    logs: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.logs.lock().unwrap()).to_string()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logs.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[test]
fn reporter_logs_outstanding_resources() {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(logs.clone())
        .with_ansi(false)
        .without_time()
        .finish();

    let result = tracing::subscriber::with_default(subscriber, || {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .start_paused(true)
            .build()
            .unwrap()
            .block_on(async {
                let provider = FakeStatusProvider::new();
                provider
                    .push_status(&pod("db-0"), ready(true));
                provider
                    .push_status_times(&pod("db-1"), ready(false), 2)
                    .push_status(&pod("db-1"), ready(true));

                Waiter::new(provider)
                    .with_condition_wait_many(vec![pod("db-0"), pod("db-1")], "Ready")
                    .with_poll_interval(Duration::from_millis(100))
                    .with_timeout(Duration::from_secs(5))
                    .execute(&CancellationToken::new())
                    .await
            })
    });

    assert!(result.is_ok());
    let logs = logs.contents();
    assert!(
        logs.contains("waiting on resources to reach the required condition/phase"),
        "Should log progress. Logs:\n{}",
        logs
    );
    assert!(
        logs.contains("count=1") && logs.contains("default/db-1"),
        "Should list the outstanding resource. Logs:\n{}",
        logs
    );
    assert!(
        logs.contains("all resources reached the required condition/phase"),
        "Should log completion. Logs:\n{}",
        logs
    );
}
