//! Single-flight and scheduling behavior
//!
//! Verifies that overlapping triggers never start a second concurrent scan,
//! and that the scheduler performs an immediate startup scan before its
//! timed loop.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use pulsewatch::scanner::Scanner;
use pulsewatch::scheduler::SchedulerHandle;
use pulsewatch::state::SchedulerPhase;
use pulsewatch::transport::Transport;

mod helpers;
use helpers::*;

const TIMEOUT: Duration = Duration::from_millis(10_000);

#[tokio::test(start_paused = true)]
async fn second_trigger_during_scan_is_noop() {
    let targets = make_targets(&["a", "b", "c"]);
    let transport = Arc::new(ScriptedTransport::uniform(
        Behavior::RespondAfter(Duration::from_millis(1_000)),
        &targets,
    ));
    let scanner = Arc::new(Scanner::new(targets, TIMEOUT, Arc::clone(&transport) as Arc<dyn Transport>));

    let first = {
        let scanner = Arc::clone(&scanner);
        tokio::spawn(async move { scanner.run_scan().await })
    };

    // Let the first scan claim the single-flight guard
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }

    // Absorbed without probing anything
    assert!(scanner.run_scan().await.is_none());

    let scan = first.await.unwrap().expect("first scan should complete");
    assert_eq!(scan.outcomes.len(), 3);

    // Only one scan's worth of probes ran
    assert_eq!(transport.total_checks(), 3);
    assert!(transport.max_in_flight() <= 3);
}

#[tokio::test(start_paused = true)]
async fn scan_runs_again_after_completion() {
    let targets = make_targets(&["a"]);
    let transport = Arc::new(ScriptedTransport::uniform(
        Behavior::RespondAfter(Duration::from_millis(10)),
        &targets,
    ));
    let scanner = Scanner::new(targets, TIMEOUT, Arc::clone(&transport) as Arc<dyn Transport>);

    assert!(scanner.run_scan().await.is_some());
    assert!(scanner.run_scan().await.is_some());
    assert_eq!(transport.total_checks(), 2);
}

#[tokio::test(start_paused = true)]
async fn scheduler_scans_immediately_on_start() {
    let targets = make_targets(&["a", "b"]);
    let transport = Arc::new(ScriptedTransport::uniform(
        Behavior::RespondAfter(Duration::from_millis(10)),
        &targets,
    ));
    let scanner = Arc::new(Scanner::new(targets, TIMEOUT, Arc::clone(&transport) as Arc<dyn Transport>));

    let handle = SchedulerHandle::spawn(Arc::clone(&scanner), Duration::from_secs(60));

    // Give the startup tick room to fire and finish (virtual time)
    tokio::time::sleep(Duration::from_secs(1)).await;

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.health, Some(100));
    assert_eq!(snapshot.phase, SchedulerPhase::Idle);
    assert!(snapshot.last_completed.is_some());
    assert_eq!(transport.total_checks(), 2);

    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn scheduler_ticks_on_fixed_period() {
    let targets = make_targets(&["a"]);
    let transport = Arc::new(ScriptedTransport::uniform(
        Behavior::RespondAfter(Duration::from_millis(10)),
        &targets,
    ));
    let scanner = Arc::new(Scanner::new(targets, TIMEOUT, Arc::clone(&transport) as Arc<dyn Transport>));

    let handle = SchedulerHandle::spawn(scanner, Duration::from_secs(60));

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(transport.total_checks(), 1);

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(transport.total_checks(), 2);

    tokio::time::sleep(Duration::from_secs(120)).await;
    assert_eq!(transport.total_checks(), 4);

    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn manual_trigger_through_handle() {
    let targets = make_targets(&["a"]);
    let transport = Arc::new(ScriptedTransport::uniform(
        Behavior::RespondAfter(Duration::from_millis(10)),
        &targets,
    ));
    let scanner = Arc::new(Scanner::new(targets, TIMEOUT, Arc::clone(&transport) as Arc<dyn Transport>));

    let handle = SchedulerHandle::spawn(scanner, Duration::from_secs(60));

    // Wait out the startup scan first
    tokio::time::sleep(Duration::from_secs(1)).await;

    let result = handle.scan_now().await.unwrap();
    assert!(result.is_some());
    assert_eq!(result.unwrap().outcomes.len(), 1);
    assert_eq!(transport.total_checks(), 2);

    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn manual_trigger_during_scan_absorbed() {
    let targets = make_targets(&["a", "b"]);
    let transport = Arc::new(ScriptedTransport::uniform(
        Behavior::RespondAfter(Duration::from_millis(5_000)),
        &targets,
    ));
    let scanner = Arc::new(Scanner::new(targets, TIMEOUT, Arc::clone(&transport) as Arc<dyn Transport>));

    let handle = SchedulerHandle::spawn(scanner, Duration::from_secs(60));

    // Startup scan is in flight (probes sleep 5s); trigger while scanning
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }

    let result = handle.scan_now().await.unwrap();
    assert!(result.is_none());

    // Only the startup scan's probes ran so far
    assert_eq!(transport.total_checks(), 2);

    handle.shutdown().await.unwrap();
}
