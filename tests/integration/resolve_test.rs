//! Materializing remote-only assets through the content server

use assetsync_app::AssetSync;
use assetsync_catalog::{AudibleAssetDefinition, CatalogStatus, VisualAssetDefinition};
use assetsync_common::AssetCategory;
use serde_json::json;
use url::Url;

mod common;

use common::TestEnv;

#[test_log::test(tokio::test)]
async fn test_resolve_downloads_and_marks_local() {
    let env = TestEnv::new().await;
    env.serve_manifest(AssetCategory::Visuals, json!([])).await;
    env.serve_manifest(
        AssetCategory::Audible,
        json!([{"id": "chime", "path": "bells/chime.wav"}]),
    )
    .await;
    env.serve_content(AssetCategory::Audible, "bells/chime.wav", b"RIFF....WAVE")
        .await;

    let sync = AssetSync::bootstrap(&env.config()).await.unwrap();
    let chime = AudibleAssetDefinition::new("chime", "bells/chime.wav");
    assert_eq!(sync.audible().supply_all_remote_only_definitions(), vec![chime.clone()]);

    let content = sync.audible().resolve(&chime).await.unwrap();

    let on_disk = env.local_file(AssetCategory::Audible, "bells/chime.wav");
    assert_eq!(std::fs::read(&on_disk).unwrap(), b"RIFF....WAVE");
    assert_eq!(content.id, "chime");
    assert_eq!(content.file_path, Url::from_file_path(&on_disk).unwrap());
    assert!(sync.audible().supply_all_local_definitions().contains(&chime));
    assert!(sync.audible().supply_all_remote_only_definitions().is_empty());
    assert_eq!(sync.audible().supply_all_definitions(), vec![chime]);

    sync.shutdown().await;
}

#[test_log::test(tokio::test)]
async fn test_resolve_serves_local_file_without_download() {
    let env = TestEnv::new().await;
    env.serve_manifest(
        AssetCategory::Visuals,
        json!([{"id": "wave", "path": "wave.gif", "alt": "Waving"}]),
    )
    .await;
    env.serve_manifest(AssetCategory::Audible, json!([])).await;
    env.place_local(AssetCategory::Visuals, "wave.gif", b"GIF89a");

    let sync = AssetSync::bootstrap(&env.config()).await.unwrap();
    let wave = sync.visuals().supply_all_definitions()[0].clone();
    assert_eq!(wave, VisualAssetDefinition::new("wave", "wave.gif"));

    let content = sync.visuals().resolve(&wave).await.unwrap();
    assert_eq!(content.alt, "Waving");
    assert!(content.file_path.as_str().ends_with("/visuals/wave.gif"));

    let content_requests = env
        .content_server
        .received_requests()
        .await
        .unwrap_or_default();
    assert!(content_requests.is_empty());

    sync.shutdown().await;
}

#[test_log::test(tokio::test)]
async fn test_missing_remote_asset_resolves_to_nothing() {
    let env = TestEnv::new().await;
    env.serve_manifest(AssetCategory::Visuals, json!([])).await;
    env.serve_manifest(
        AssetCategory::Audible,
        json!([{"id": "gone", "path": "gone.wav"}]),
    )
    .await;

    let sync = AssetSync::bootstrap(&env.config()).await.unwrap();
    let gone = AudibleAssetDefinition::new("gone", "gone.wav");
    let before = sync.audible().snapshot();

    assert!(sync.audible().resolve(&gone).await.is_none());
    assert!(!env.local_file(AssetCategory::Audible, "gone.wav").exists());
    assert_eq!(sync.audible().status(), CatalogStatus::Ok);
    assert!(std::sync::Arc::ptr_eq(&before, &sync.audible().snapshot()));

    sync.shutdown().await;
}

#[test_log::test(tokio::test)]
async fn test_downloaded_visual_survives_next_update_cycle() {
    let env = TestEnv::new().await;
    env.serve_manifest(
        AssetCategory::Visuals,
        json!([{"id": "nod", "path": "nod.gif"}]),
    )
    .await;
    env.serve_manifest(AssetCategory::Audible, json!([])).await;
    env.serve_content(AssetCategory::Visuals, "nod.gif", b"GIF89a").await;

    let sync = AssetSync::bootstrap(&env.config()).await.unwrap();
    let nod = VisualAssetDefinition::new("nod", "nod.gif");
    sync.visuals().resolve(&nod).await.unwrap();

    let manifest_path = format!("/api/{}", AssetCategory::Visuals.manifest_path());
    let forced_before = forced_requests(&env, &manifest_path).await;
    sync.check_for_updates().await;

    let env_ref = &env;
    let manifest_path_ref = &manifest_path;
    common::eventually(|| async move {
        forced_requests(env_ref, manifest_path_ref).await > forced_before
    })
    .await;

    let visuals = sync.visuals().clone();
    sync.shutdown().await;
    assert!(visuals.supply_all_local_definitions().contains(&nod));
}

async fn forced_requests(env: &TestEnv, manifest_path: &str) -> usize {
    env.manifest_server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| {
            request.url.path() == manifest_path
                && request
                    .headers
                    .get("cache-control")
                    .is_some_and(|value| value == "no-cache")
        })
        .count()
}
