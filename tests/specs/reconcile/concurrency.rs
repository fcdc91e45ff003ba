use crate::prelude::*;
use similar_asserts::assert_eq;

async fn with_running_job(policy: ConcurrencyPolicy) -> (World, ObjectKey) {
    let world = World::at("2026-01-01T10:00:00Z");
    let key = world.apply(
        world
            .scheduled("tick", "* * * * *")
            .concurrency_policy(policy)
            .build(),
    );
    let outcome = world.reconcile(&key).await;
    world.follow(&key, outcome).await;
    let first = run_name("tick", "2026-01-01T10:01:00Z");
    world.start(&first);
    assert_eq!(world.job_names(), vec![first]);

    world.advance(60);
    (world, key)
}

#[tokio::test]
async fn allow_overlaps_runs() {
    let (world, key) = with_running_job(ConcurrencyPolicy::Allow).await;

    assert_eq!(world.reconcile(&key).await, secs(60));
    assert_eq!(world.job_names().len(), 2);
}

#[tokio::test]
async fn forbid_skips_while_a_run_is_active() {
    let (world, key) = with_running_job(ConcurrencyPolicy::Forbid).await;
    let creates = world.creates();

    assert_eq!(world.reconcile(&key).await, secs(60));
    assert_eq!(world.creates(), creates);
    assert_eq!(
        world.active_names(&key),
        vec![run_name("tick", "2026-01-01T10:01:00Z")]
    );
}

#[tokio::test]
async fn forbid_resumes_once_the_active_run_finishes() {
    let (world, key) = with_running_job(ConcurrencyPolicy::Forbid).await;
    world.reconcile(&key).await;

    world.finish(&run_name("tick", "2026-01-01T10:01:00Z"), true);
    world.advance(60);
    world.reconcile(&key).await;

    // The skipped 10:02 slot is not made up
    assert_eq!(
        world.job_names(),
        vec![
            run_name("tick", "2026-01-01T10:01:00Z"),
            run_name("tick", "2026-01-01T10:03:00Z"),
        ]
    );
}

#[tokio::test]
async fn replace_swaps_the_active_run() {
    let (world, key) = with_running_job(ConcurrencyPolicy::Replace).await;

    assert_eq!(world.reconcile(&key).await, secs(60));
    assert_eq!(
        world.job_names(),
        vec![run_name("tick", "2026-01-01T10:02:00Z")]
    );
    assert_eq!(world.deletes(), 1);
}

#[tokio::test]
async fn replace_reports_a_failed_delete_for_retry() {
    let (world, key) = with_running_job(ConcurrencyPolicy::Replace).await;
    world.store.fail_next(
        cj_adapters::StoreOp::Delete,
        cj_adapters::StoreError::Backend("etcd unavailable".to_string()),
    );
    let creates = world.creates();

    assert!(world.try_reconcile(&key).await.is_err());
    assert_eq!(world.creates(), creates);

    // Redelivery succeeds
    assert_eq!(world.reconcile(&key).await, secs(60));
    assert_eq!(
        world.job_names(),
        vec![run_name("tick", "2026-01-01T10:02:00Z")]
    );
}
