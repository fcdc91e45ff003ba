use crate::prelude::*;
use cj_core::ControllerConfig;
use similar_asserts::assert_eq;

const CONFIG: &str = r#"
api_version = "ops.example.com/v2"
kind = "Schedule"
owner_index_key = "owner"
scheduled_time_annotation = "ops.example.com/slot"
max_missed_runs = 5
"#;

#[tokio::test]
async fn configured_identifiers_are_stamped_on_children() {
    let config = ControllerConfig::from_toml_str(CONFIG).unwrap();
    let world = World::with_config("2026-01-01T10:00:30Z", config);
    let key = world.apply(
        world
            .scheduled("tick", "* * * * *")
            .created_at(t("2026-01-01T09:59:50Z"))
            .build(),
    );

    world.reconcile(&key).await;

    let job = world.store.jobs().remove(0);
    assert_eq!(
        job.metadata.annotations.get("ops.example.com/slot").cloned(),
        Some("2026-01-01T10:00:00Z".to_string())
    );
    let owner = cj_core::controller_of(&job.metadata).unwrap();
    assert_eq!(owner.api_version, "ops.example.com/v2");
    assert_eq!(owner.kind, "Schedule");

    // Listed back through the configured index
    world.advance(5);
    world.reconcile(&key).await;
    assert_eq!(world.active_names(&key), vec![job.metadata.name]);
}

#[tokio::test]
async fn configured_missed_run_cap_applies() {
    let config = ControllerConfig::from_toml_str(CONFIG).unwrap();
    let world = World::with_config("2026-01-01T10:06:30Z", config);
    let key = world.apply(
        world
            .scheduled("tick", "* * * * *")
            .created_at(t("2026-01-01T10:00:00Z"))
            .build(),
    );

    assert_eq!(world.reconcile(&key).await, ReconcileOutcome::NoRequeue);
    assert!(world.job_names().is_empty());
}

#[tokio::test]
async fn children_of_another_owner_type_are_ignored() {
    let world = World::at("2026-01-01T10:00:30Z");
    let key = world.apply(
        world
            .scheduled("tick", "* * * * *")
            .created_at(t("2026-01-01T10:00:10Z"))
            .build(),
    );
    let other = ControllerConfig {
        kind: "Pipeline".to_string(),
        ..ControllerConfig::default()
    };
    let sj = world.store.scheduled_job(&key).unwrap();
    world.store.put_job(
        cj_core::test_support::JobBuilder::new("tick-foreign")
            .owned_by(&sj, &other)
            .build(),
    );

    world.reconcile(&key).await;

    assert!(world.active_names(&key).is_empty());
}
