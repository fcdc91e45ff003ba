use crate::prelude::*;
use similar_asserts::assert_eq;

#[tokio::test]
async fn minutely_schedule_catches_up_on_the_latest_slot() {
    let world = World::at("2026-01-01T10:05:30Z");
    let sj = world
        .scheduled("tick", "* * * * *")
        .created_at(t("2026-01-01T10:04:00Z"))
        .build();
    let key = world.apply(sj);

    let outcome = world.reconcile(&key).await;

    assert_eq!(outcome, secs(30));
    assert_eq!(
        world.job_names(),
        vec![run_name("tick", "2026-01-01T10:05:00Z")]
    );
}

#[tokio::test]
async fn following_requeues_creates_one_job_per_slot() {
    let world = World::at("2026-01-01T10:00:00Z");
    let key = world.apply(world.scheduled("tick", "*/5 * * * *").build());

    let mut outcome = world.reconcile(&key).await;
    assert_eq!(outcome, secs(300));
    for _ in 0..3 {
        outcome = world.follow(&key, outcome).await;
        assert_eq!(outcome, secs(300));
    }

    assert_eq!(
        world.job_names(),
        vec![
            run_name("tick", "2026-01-01T10:05:00Z"),
            run_name("tick", "2026-01-01T10:10:00Z"),
            run_name("tick", "2026-01-01T10:15:00Z"),
        ]
    );

    // Status is written before the run is started, so it catches up a pass later
    assert_eq!(
        world.status(&key).last_schedule_time,
        Some(t("2026-01-01T10:10:00Z"))
    );
    world.reconcile(&key).await;
    assert_eq!(
        world.status(&key).last_schedule_time,
        Some(t("2026-01-01T10:15:00Z"))
    );
    assert_eq!(world.job_names().len(), 3);
}

#[tokio::test]
async fn early_wakeups_do_not_start_runs() {
    let world = World::at("2026-01-01T10:00:00Z");
    let key = world.apply(world.scheduled("hourly", "@hourly").build());

    for _ in 0..5 {
        world.advance(600);
        world.reconcile(&key).await;
    }

    assert!(world.job_names().is_empty());
    assert_eq!(world.reconcile(&key).await, secs(600));
}

#[tokio::test]
async fn downtime_beyond_the_cap_pauses_without_a_timer() {
    let world = World::at("2026-01-03T00:00:00Z");
    let sj = world
        .scheduled("tick", "* * * * *")
        .created_at(t("2026-01-01T00:00:00Z"))
        .build();
    let key = world.apply(sj);

    assert_eq!(world.reconcile(&key).await, ReconcileOutcome::NoRequeue);
    assert_eq!(world.creates(), 0);
}

#[tokio::test]
async fn starting_deadline_recovers_from_downtime() {
    let world = World::at("2026-01-03T00:00:10Z");
    let sj = world
        .scheduled("tick", "* * * * *")
        .created_at(t("2026-01-01T00:00:00Z"))
        .starting_deadline_seconds(30)
        .build();
    let key = world.apply(sj);

    assert_eq!(world.reconcile(&key).await, secs(50));
    assert_eq!(
        world.job_names(),
        vec![run_name("tick", "2026-01-03T00:00:00Z")]
    );
}

#[tokio::test]
async fn invalid_schedule_waits_for_a_fix() {
    let world = World::at("2026-01-01T10:00:00Z");
    let key = world.apply(world.scheduled("tick", "*/5 * * *").build());

    assert_eq!(world.reconcile(&key).await, ReconcileOutcome::NoRequeue);

    // The user corrects the expression
    let mut sj = world.store.scheduled_job(&key).unwrap();
    sj.spec.schedule = "*/5 * * * *".to_string();
    world.apply(sj);
    world.advance(300);

    assert_eq!(world.reconcile(&key).await, secs(300));
    assert_eq!(
        world.job_names(),
        vec![run_name("tick", "2026-01-01T10:05:00Z")]
    );
}

#[tokio::test]
async fn deleted_scheduled_job_is_forgotten() {
    let world = World::at("2026-01-01T10:00:00Z");
    let key = world.apply(world.scheduled("tick", "* * * * *").build());
    world.reconcile(&key).await;

    world.store.remove_scheduled_job(&key);

    assert_eq!(world.reconcile(&key).await, ReconcileOutcome::NoRequeue);
}
