use crate::prelude::*;
use similar_asserts::assert_eq;

#[tokio::test]
async fn suspended_job_tracks_actives_but_starts_nothing() {
    let world = World::at("2026-01-01T10:00:30Z");
    let key = world.apply(world.scheduled("tick", "* * * * *").build());

    let outcome = world.follow(&key, world.reconcile(&key).await).await;
    world.follow(&key, outcome).await;
    assert_eq!(world.job_names().len(), 2);

    let mut sj = world.store.scheduled_job(&key).unwrap();
    sj.spec.suspend = true;
    world.apply(sj);
    world.advance(600);
    let creates = world.creates();

    assert_eq!(world.reconcile(&key).await, ReconcileOutcome::NoRequeue);
    assert_eq!(world.creates(), creates);
    assert_eq!(world.active_names(&key), world.job_names());
}

#[tokio::test]
async fn resuming_runs_only_the_latest_missed_slot() {
    let world = World::at("2026-01-01T10:00:00Z");
    let key = world.apply(world.scheduled("tick", "* * * * *").suspend(true).build());
    world.reconcile(&key).await;

    world.advance(10 * 60 + 15);
    let mut sj = world.store.scheduled_job(&key).unwrap();
    sj.spec.suspend = false;
    world.apply(sj);

    assert_eq!(world.reconcile(&key).await, secs(45));
    assert_eq!(
        world.job_names(),
        vec![run_name("tick", "2026-01-01T10:10:00Z")]
    );
}
