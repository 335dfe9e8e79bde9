//! End-to-end bootstrap against HTTP manifest and content servers

use std::collections::HashSet;

use assetsync_app::AssetSync;
use assetsync_catalog::{CatalogStatus, VisualAssetDefinition};
use assetsync_common::AssetCategory;
use serde_json::json;

mod common;

use common::TestEnv;

#[test_log::test(tokio::test)]
async fn test_bootstrap_partitions_visuals_after_priming() {
    let env = TestEnv::new().await;
    env.serve_manifest(
        AssetCategory::Visuals,
        json!([
            {"id": "wave", "path": "anime/wave.gif", "alt": "Waving", "categories": [1]},
            {"id": "nod", "path": "anime/nod.gif"}
        ]),
    )
    .await;
    env.serve_manifest(AssetCategory::Audible, json!([])).await;
    env.place_local(AssetCategory::Visuals, "anime/wave.gif", b"GIF89a");

    let sync = AssetSync::bootstrap(&env.config()).await.unwrap();

    let visuals = sync.visuals();
    assert_eq!(visuals.status(), CatalogStatus::Ok);
    assert_eq!(
        visuals.supply_all_local_definitions(),
        HashSet::from([VisualAssetDefinition::new("wave", "anime/wave.gif")])
    );
    assert_eq!(
        visuals.supply_all_remote_only_definitions(),
        vec![VisualAssetDefinition::new("nod", "anime/nod.gif")]
    );
    assert_eq!(visuals.supply_all_definitions()[0].alt, "Waving");

    assert_eq!(sync.audible().status(), CatalogStatus::Ok);
    assert!(sync.audible().supply_all_definitions().is_empty());

    sync.shutdown().await;
}

#[test_log::test(tokio::test)]
async fn test_unreachable_manifest_breaks_only_that_category() {
    let env = TestEnv::new().await;
    env.serve_manifest(
        AssetCategory::Visuals,
        json!([{"id": "wave", "path": "wave.gif"}]),
    )
    .await;
    env.fail_manifest(AssetCategory::Audible, 503).await;

    let sync = AssetSync::bootstrap(&env.config()).await.unwrap();

    assert_eq!(sync.visuals().status(), CatalogStatus::Ok);
    assert_eq!(sync.audible().status(), CatalogStatus::Broken);
    assert!(sync.audible().supply_all_definitions().is_empty());
    assert!(sync.audible().supply_all_local_definitions().is_empty());
    assert!(sync.audible().supply_all_remote_only_definitions().is_empty());

    sync.shutdown().await;
}

#[test_log::test(tokio::test)]
async fn test_malformed_manifest_breaks_catalog() {
    let env = TestEnv::new().await;
    env.serve_manifest(AssetCategory::Visuals, json!({"assets": []}))
        .await;
    env.serve_manifest(AssetCategory::Audible, json!([])).await;

    let sync = AssetSync::bootstrap(&env.config()).await.unwrap();

    assert_eq!(sync.visuals().status(), CatalogStatus::Broken);
    assert_eq!(sync.audible().status(), CatalogStatus::Ok);

    sync.shutdown().await;
}

#[test_log::test(tokio::test)]
async fn test_cached_manifest_serves_initial_load_when_api_is_down() {
    let env = TestEnv::new().await;
    env.serve_manifest(
        AssetCategory::Audible,
        json!([{"id": "chime", "path": "chime.wav"}]),
    )
    .await;
    env.serve_manifest(AssetCategory::Visuals, json!([])).await;

    let first = AssetSync::bootstrap(&env.config()).await.unwrap();
    assert_eq!(first.audible().supply_all_definitions().len(), 1);
    first.shutdown().await;

    env.manifest_server.reset().await;
    env.fail_manifest(AssetCategory::Audible, 500).await;
    env.fail_manifest(AssetCategory::Visuals, 500).await;

    let second = AssetSync::bootstrap(&env.config()).await.unwrap();
    assert_eq!(second.audible().status(), CatalogStatus::Ok);
    assert_eq!(second.audible().supply_all_definitions().len(), 1);
    assert_eq!(env.manifest_requests(AssetCategory::Audible).await, 0);

    second.shutdown().await;
}
