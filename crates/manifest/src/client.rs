//! HTTP Manifest Source Implementation
//!
//! Fetches category manifests from `{api_base_url}/assets/{category}` and keeps
//! the last good copy of each under the cache directory. Only bodies that decode
//! as a JSON array are cached. A normal resolve may be
//! served from that copy while it is fresh, and falls back to it (stale) when the
//! origin cannot be reached. A forced resolve always goes to the origin.

use std::path::{Path, PathBuf};
use std::time::Duration;

use assetsync_common::AssetCategory;
use reqwest::header::CACHE_CONTROL;
use url::Url;

use crate::{CacheMode, ManifestConfig, ManifestError, ManifestLocation, ManifestSource};

/// Real HTTP manifest source.
pub struct HttpManifestSource {
    http: reqwest::Client,
    base_url: Url,
    cache_dir: PathBuf,
    cache_ttl: Duration,
    timeout: Duration,
}

impl HttpManifestSource {
    /// Create a new HTTP manifest source from configuration.
    pub fn new(config: ManifestConfig) -> Result<Self, ManifestError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ManifestError::Configuration(e.to_string()))?;

        // Url::join replaces the last segment unless the base ends in a slash
        let mut base_url = config.api_base_url;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            http,
            base_url,
            cache_dir: config.cache_dir,
            cache_ttl: config.cache_ttl,
            timeout: config.timeout,
        })
    }

    fn locate(
        &self,
        category: AssetCategory,
        cache_mode: CacheMode,
    ) -> Result<ManifestLocation, ManifestError> {
        let url = self.base_url.join(&category.manifest_path()).map_err(|e| {
            tracing::warn!(%category, error = %e, "Unable to build manifest URL");
            ManifestError::Unavailable(category)
        })?;

        Ok(ManifestLocation {
            category,
            url,
            cache_mode,
        })
    }

    fn cache_path(&self, category: AssetCategory) -> PathBuf {
        self.cache_dir.join(format!("{}.json", category))
    }

    async fn download(&self, location: &ManifestLocation) -> Result<Vec<u8>, ManifestError> {
        let mut request = self.http.get(location.url.clone());
        if location.cache_mode == CacheMode::Bypass {
            request = request.header(CACHE_CONTROL, "no-cache");
        }

        tracing::debug!(category = %location.category, url = %location.url, "Requesting manifest");

        let response = request.send().await.map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read response body".to_string());
            return Err(ManifestError::Response(format!(
                "Manifest API returned {}: {}",
                status, body
            )));
        }

        let bytes = response.bytes().await.map_err(|e| self.classify(e))?;
        Ok(bytes.to_vec())
    }

    fn classify(&self, error: reqwest::Error) -> ManifestError {
        if error.is_timeout() {
            ManifestError::Timeout(self.timeout)
        } else {
            ManifestError::Request(error.to_string())
        }
    }
}

/// Read a cached manifest, ignoring it when older than `max_age`.
async fn read_cache(path: &Path, max_age: Option<Duration>) -> Option<Vec<u8>> {
    if let Some(max_age) = max_age {
        let modified = tokio::fs::metadata(path).await.ok()?.modified().ok()?;
        let age = modified.elapsed().unwrap_or(Duration::ZERO);
        if age >= max_age {
            return None;
        }
    }
    tokio::fs::read(path).await.ok()
}

fn is_manifest(bytes: &[u8]) -> bool {
    serde_json::from_slice::<Vec<serde_json::Value>>(bytes).is_ok()
}

/// Replace a cached manifest; failures only cost the next fetch a round trip.
/// Bodies that are not a JSON array leave the previous copy in place.
async fn write_cache(path: &Path, bytes: &[u8]) {
    if !is_manifest(bytes) {
        tracing::warn!(path = %path.display(), "Response is not a manifest array, not caching it");
        return;
    }

    let result = async {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let staging = path.with_extension("json.part");
        tokio::fs::write(&staging, bytes).await?;
        tokio::fs::rename(&staging, path).await
    }
    .await;

    if let Err(e) = result {
        tracing::warn!(path = %path.display(), error = %e, "Unable to cache manifest");
    }
}

#[async_trait::async_trait]
impl ManifestSource for HttpManifestSource {
    async fn resolve(&self, category: AssetCategory) -> Result<ManifestLocation, ManifestError> {
        self.locate(category, CacheMode::Default)
    }

    async fn force_resolve(
        &self,
        category: AssetCategory,
    ) -> Result<ManifestLocation, ManifestError> {
        self.locate(category, CacheMode::Bypass)
    }

    async fn fetch(&self, location: &ManifestLocation) -> Result<Vec<u8>, ManifestError> {
        let cache_path = self.cache_path(location.category);

        match location.cache_mode {
            CacheMode::Default => {
                if let Some(fresh) = read_cache(&cache_path, Some(self.cache_ttl)).await {
                    tracing::debug!(category = %location.category, "Serving manifest from cache");
                    return Ok(fresh);
                }

                match self.download(location).await {
                    Ok(bytes) => {
                        write_cache(&cache_path, &bytes).await;
                        Ok(bytes)
                    }
                    Err(e) => match read_cache(&cache_path, None).await {
                        Some(stale) => {
                            tracing::warn!(
                                category = %location.category,
                                error = %e,
                                "Manifest origin unreachable, serving stale cached copy"
                            );
                            Ok(stale)
                        }
                        None => Err(e),
                    },
                }
            }
            CacheMode::Bypass => {
                let bytes = self.download(location).await?;
                write_cache(&cache_path, &bytes).await;
                Ok(bytes)
            }
        }
    }
}
