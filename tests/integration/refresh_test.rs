//! Lifecycle-driven refresh against an HTTP manifest server

use assetsync_app::AssetSync;
use assetsync_catalog::{AudibleAssetDefinition, CatalogStatus};
use assetsync_common::AssetCategory;
use serde_json::json;

mod common;

use common::{eventually, TestEnv};

fn chime(id: &str) -> AudibleAssetDefinition {
    AudibleAssetDefinition::new(id, format!("{}.wav", id))
}

#[test_log::test(tokio::test)]
async fn test_update_reloads_with_forced_fetch() {
    let env = TestEnv::new().await;
    env.serve_manifest(AssetCategory::Visuals, json!([])).await;
    env.serve_manifest(
        AssetCategory::Audible,
        json!([{"id": "a", "path": "a.wav"}, {"id": "b", "path": "b.wav"}]),
    )
    .await;
    env.place_local(AssetCategory::Audible, "a.wav", b"RIFF");
    env.place_local(AssetCategory::Audible, "b.wav", b"RIFF");

    let sync = AssetSync::bootstrap(&env.config()).await.unwrap();
    assert_eq!(sync.audible().supply_all_definitions(), vec![chime("a"), chime("b")]);

    // Only a cache-bypassing request sees the new manifest
    env.serve_forced_manifest(
        AssetCategory::Audible,
        json!([{"id": "b", "path": "b.wav"}, {"id": "c", "path": "c.wav"}]),
    )
    .await;
    assert_eq!(sync.publish_update(), 2);

    let audible = sync.audible().clone();
    eventually(|| {
        let audible = audible.clone();
        async move { audible.supply_all_definitions() == vec![chime("b"), chime("c")] }
    })
    .await;

    assert_eq!(audible.status(), CatalogStatus::Ok);
    assert_eq!(
        audible.supply_all_local_definitions(),
        [chime("b")].into_iter().collect::<std::collections::HashSet<_>>()
    );
    assert_eq!(audible.supply_all_remote_only_definitions(), vec![chime("c")]);

    sync.shutdown().await;
}

#[test_log::test(tokio::test)]
async fn test_failed_refresh_keeps_last_good_catalog() {
    let env = TestEnv::new().await;
    env.serve_manifest(AssetCategory::Visuals, json!([])).await;
    env.serve_manifest(
        AssetCategory::Audible,
        json!([{"id": "a", "path": "a.wav"}, {"id": "b", "path": "b.wav"}]),
    )
    .await;
    env.place_local(AssetCategory::Audible, "a.wav", b"RIFF");

    let sync = AssetSync::bootstrap(&env.config()).await.unwrap();
    let before = sync.audible().snapshot();

    env.manifest_server.reset().await;
    env.fail_manifest(AssetCategory::Audible, 500).await;
    env.fail_manifest(AssetCategory::Visuals, 500).await;
    sync.publish_update();

    let env_ref = &env;
    eventually(|| async move { env_ref.manifest_requests(AssetCategory::Audible).await >= 1 })
        .await;

    // Shutdown waits for the in-flight refresh to apply its outcome
    let audible = sync.audible().clone();
    sync.shutdown().await;

    let after = audible.snapshot();
    assert_eq!(after.status, CatalogStatus::Ok);
    assert_eq!(after.all, before.all);
    assert_eq!(after.local, before.local);
    assert_eq!(audible.supply_all_remote_only_definitions(), vec![chime("b")]);
}
