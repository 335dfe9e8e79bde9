//! Filesystem content store and path resolver

use std::path::{Component, Path, PathBuf};

use assetsync_common::AssetCategory;
use url::Url;

use crate::{AssetPathResolver, LocalPresence, StorageConfig, StorageError};

/// Local asset storage laid out as `{root}/{category}/{path}`
#[derive(Debug, Clone)]
pub struct ContentStore {
    root: PathBuf,
}

impl ContentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding every asset of one category
    pub fn category_dir(&self, category: AssetCategory) -> PathBuf {
        self.root.join(category.as_str())
    }

    /// Local path of an asset; rejects paths that would escape the category directory
    pub fn local_path(&self, category: AssetCategory, path: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if path.is_empty() || escapes {
            return Err(StorageError::InvalidPath(path.to_string()));
        }
        Ok(self.category_dir(category).join(relative))
    }
}

impl LocalPresence for ContentStore {
    fn exists_locally(&self, category: AssetCategory, path: &str) -> bool {
        self.local_path(category, path)
            .map(|local| local.is_file())
            .unwrap_or(false)
    }
}

fn file_url(path: &Path) -> Result<Url, StorageError> {
    let absolute = std::path::absolute(path).map_err(|e| StorageError::Io(e.to_string()))?;
    Url::from_file_path(&absolute)
        .map_err(|_| StorageError::Io(format!("not a file URL: {}", absolute.display())))
}

/// Serves local files and downloads missing ones into the store
pub struct StoreResolver {
    store: ContentStore,
    http: reqwest::Client,
    content_base_url: Option<Url>,
}

impl StoreResolver {
    pub fn new(config: StorageConfig) -> Result<Self, StorageError> {
        let http = reqwest::Client::builder()
            .timeout(config.download_timeout)
            .build()
            .map_err(|e| StorageError::Configuration(e.to_string()))?;

        let content_base_url = config.content_base_url.map(|mut base| {
            if !base.path().ends_with('/') {
                let path = format!("{}/", base.path());
                base.set_path(&path);
            }
            base
        });

        Ok(Self {
            store: ContentStore::new(config.content_root),
            http,
            content_base_url,
        })
    }

    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    async fn download(
        &self,
        category: AssetCategory,
        path: &str,
        destination: &Path,
    ) -> Result<(), StorageError> {
        let base = self
            .content_base_url
            .as_ref()
            .ok_or_else(|| StorageError::NotFound {
                category,
                path: path.to_string(),
            })?;
        let remote = base
            .join(&format!("{}/{}", category, path))
            .map_err(|e| StorageError::InvalidPath(format!("{}: {}", path, e)))?;

        tracing::debug!(%category, url = %remote, "Downloading asset");

        let response = self
            .http
            .get(remote.clone())
            .send()
            .await
            .map_err(|e| StorageError::Download(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StorageError::NotFound {
                category,
                path: path.to_string(),
            });
        }
        if !response.status().is_success() {
            return Err(StorageError::Download(format!(
                "Content server returned {} for {}",
                response.status(),
                remote
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| StorageError::Download(e.to_string()))?;

        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::Io(e.to_string()))?;
        }
        let mut staging = destination.as_os_str().to_owned();
        staging.push(".part");
        let staging = PathBuf::from(staging);
        tokio::fs::write(&staging, &bytes)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;
        tokio::fs::rename(&staging, destination)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;

        tracing::info!(%category, path, size_bytes = bytes.len(), "Asset downloaded");
        Ok(())
    }
}

#[async_trait::async_trait]
impl AssetPathResolver for StoreResolver {
    async fn resolve(&self, category: AssetCategory, path: &str) -> Result<Url, StorageError> {
        let local = self.store.local_path(category, path)?;

        let present = tokio::fs::try_exists(&local)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;
        if !present {
            self.download(category, path, &local).await?;
        }

        file_url(&local)
    }
}
