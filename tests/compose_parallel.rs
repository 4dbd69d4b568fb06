// tests/compose_parallel.rs

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use sitepipe::compose::{Parallel, Step};
use sitepipe::types::TaskStatus;
use sitepipe_test_utils::fakes::{as_step, FakeStep};
use sitepipe_test_utils::{init_tracing, with_timeout};

#[tokio::test]
async fn parallel_members_overlap_in_time() {
    init_tracing();

    let fakes: Vec<Arc<FakeStep>> = [("a", 100), ("b", 50), ("c", 80), ("d", 30)]
        .into_iter()
        .map(|(name, ms)| FakeStep::new(name).delay(Duration::from_millis(ms)).shared())
        .collect();
    let group = Parallel::new("group", fakes.iter().map(as_step).collect());

    let started = Instant::now();
    let report = with_timeout(group.run()).await;
    let elapsed = started.elapsed();

    assert!(report.is_success());
    assert_eq!(report.results.len(), 4);
    assert!(
        elapsed >= Duration::from_millis(100),
        "group finished before its slowest member: {elapsed:?}"
    );
    assert!(
        elapsed < Duration::from_millis(250),
        "members did not run concurrently: {elapsed:?}"
    );
    for fake in &fakes {
        assert_eq!(fake.run_count(), 1);
    }
}

#[tokio::test]
async fn failing_member_does_not_stop_siblings() {
    init_tracing();

    let slow = FakeStep::new("slow").delay(Duration::from_millis(60)).shared();
    let broken = FakeStep::new("broken").failing().shared();
    let fast = FakeStep::new("fast").shared();

    let group = Parallel::new("group", vec![as_step(&slow), as_step(&broken), as_step(&fast)]);
    let report = with_timeout(group.run()).await;

    assert!(!report.is_success());
    assert_eq!(report.failed_count(), 1);
    assert!(report.get("slow").unwrap().is_success());
    assert!(report.get("fast").unwrap().is_success());
    assert!(matches!(
        report.get("broken").unwrap().status,
        TaskStatus::Failed(_)
    ));

    // The slow sibling still ran to completion.
    assert_eq!(slow.spans().len(), 1);
}

#[tokio::test]
async fn empty_group_succeeds_immediately() {
    let group = Parallel::new("nothing", Vec::new());
    let report = with_timeout(group.run()).await;

    assert!(report.is_success());
    assert!(report.results.is_empty());
}
