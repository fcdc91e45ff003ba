use crate::prelude::*;
use similar_asserts::assert_eq;

#[tokio::test]
async fn duplicate_delivery_creates_one_job() {
    let world = World::at("2026-01-01T10:05:30Z");
    let key = world.apply(
        world
            .scheduled("tick", "* * * * *")
            .created_at(t("2026-01-01T10:04:00Z"))
            .build(),
    );

    let first = world.reconcile(&key).await;
    let second = world.reconcile(&key).await;
    let third = world.reconcile(&key).await;

    assert_eq!(first, secs(30));
    assert_eq!(second, first);
    assert_eq!(third, first);
    assert_eq!(world.job_names().len(), 1);
    assert_eq!(world.creates(), 1);
}

#[tokio::test]
async fn restart_recovers_history_from_annotations() {
    let mut world = World::at("2026-01-01T10:00:00Z");
    let key = world.apply(world.scheduled("tick", "*/10 * * * *").build());
    let outcome = world.reconcile(&key).await;
    world.follow(&key, outcome).await;

    // Lose the status, then come back with a fresh controller
    let mut sj = world.store.scheduled_job(&key).unwrap();
    sj.status = Default::default();
    world.apply(sj);
    world.restart();
    world.advance(120);

    assert_eq!(world.reconcile(&key).await, secs(480));
    assert_eq!(
        world.status(&key).last_schedule_time,
        Some(t("2026-01-01T10:10:00Z"))
    );
    assert_eq!(world.job_names().len(), 1);
}

#[tokio::test]
async fn crash_before_status_write_is_harmless() {
    let world = World::at("2026-01-01T10:05:30Z");
    let key = world.apply(
        world
            .scheduled("tick", "* * * * *")
            .created_at(t("2026-01-01T10:04:00Z"))
            .build(),
    );
    world.reconcile(&key).await;

    // The status update of the next pass fails; the redelivery must not
    // start the slot again.
    world.store.fail_next(
        cj_adapters::StoreOp::UpdateStatus,
        cj_adapters::StoreError::Backend("connection reset".to_string()),
    );
    assert!(world.try_reconcile(&key).await.is_err());
    world.reconcile(&key).await;

    assert_eq!(world.job_names().len(), 1);
    assert_eq!(
        world.active_names(&key),
        vec![run_name("tick", "2026-01-01T10:05:00Z")]
    );
}

#[tokio::test]
async fn job_created_elsewhere_for_the_slot_is_accepted() {
    let world = World::at("2026-01-01T10:05:30Z");
    let key = world.apply(
        world
            .scheduled("tick", "* * * * *")
            .created_at(t("2026-01-01T10:04:00Z"))
            .build(),
    );
    world.store.put_job(
        cj_core::test_support::JobBuilder::new(&run_name("tick", "2026-01-01T10:05:00Z")).build(),
    );

    assert_eq!(world.reconcile(&key).await, secs(30));
    assert_eq!(world.job_names().len(), 1);
}
