//! Common test utilities and fixtures for integration tests
//!
//! - Mock manifest API and content server (wiremock)
//! - Temporary content root
//! - Config pointing at both

#![allow(dead_code)]

use std::path::Path;
use std::time::Duration;

use assetsync_common::{AssetCategory, Config};
use serde_json::Value;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Test environment: two HTTP servers and a scratch content root
pub struct TestEnv {
    pub manifest_server: MockServer,
    pub content_server: MockServer,
    pub content_root: TempDir,
}

impl TestEnv {
    pub async fn new() -> Self {
        Self {
            manifest_server: MockServer::start().await,
            content_server: MockServer::start().await,
            content_root: tempfile::tempdir().expect("failed to create content root"),
        }
    }

    pub fn config(&self) -> Config {
        let root = self.content_root.path().to_path_buf();
        Config {
            api_base_url: format!("{}/api", self.manifest_server.uri())
                .parse()
                .expect("valid manifest server url"),
            content_base_url: Some(
                format!("{}/content", self.content_server.uri())
                    .parse()
                    .expect("valid content server url"),
            ),
            manifest_cache_dir: root.join(".manifests"),
            content_root: root,
            fetch_timeout: Duration::from_secs(2),
            update_interval: Duration::from_secs(3600),
            rust_log: "assetsync=debug".to_string(),
        }
    }

    fn manifest_path(category: AssetCategory) -> String {
        format!("/api/{}", category.manifest_path())
    }

    /// Serve a manifest for both cached and forced requests
    pub async fn serve_manifest(&self, category: AssetCategory, manifest: Value) {
        Mock::given(method("GET"))
            .and(path(Self::manifest_path(category)))
            .respond_with(ResponseTemplate::new(200).set_body_json(manifest))
            .mount(&self.manifest_server)
            .await;
    }

    /// Serve a manifest only to requests that bypass caches
    pub async fn serve_forced_manifest(&self, category: AssetCategory, manifest: Value) {
        Mock::given(method("GET"))
            .and(path(Self::manifest_path(category)))
            .and(header("cache-control", "no-cache"))
            .respond_with(ResponseTemplate::new(200).set_body_json(manifest))
            .with_priority(1)
            .mount(&self.manifest_server)
            .await;
    }

    pub async fn fail_manifest(&self, category: AssetCategory, status: u16) {
        Mock::given(method("GET"))
            .and(path(Self::manifest_path(category)))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.manifest_server)
            .await;
    }

    pub async fn serve_content(&self, category: AssetCategory, asset: &str, body: &[u8]) {
        Mock::given(method("GET"))
            .and(path(format!("/content/{}/{}", category, asset)))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
            .mount(&self.content_server)
            .await;
    }

    /// Place a file in the content root as if it had been downloaded earlier
    pub fn place_local(&self, category: AssetCategory, asset: &str, body: &[u8]) {
        let file = self.local_file(category, asset);
        if let Some(parent) = file.parent() {
            std::fs::create_dir_all(parent).expect("failed to create category dir");
        }
        std::fs::write(file, body).expect("failed to write local asset");
    }

    pub fn local_file(&self, category: AssetCategory, asset: &str) -> std::path::PathBuf {
        self.content_root
            .path()
            .join(category.as_str())
            .join(Path::new(asset))
    }

    pub async fn manifest_requests(&self, category: AssetCategory) -> usize {
        let expected = Self::manifest_path(category);
        self.manifest_server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path() == expected)
            .count()
    }
}

/// Poll until `condition` holds; panics after five seconds
pub async fn eventually<F, Fut>(mut condition: F)
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition().await {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("condition not reached within five seconds");
}
