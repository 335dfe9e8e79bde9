//! Mock Content Store Implementation
//!
//! In-memory presence set and resolver for testing catalog workflows.
//! Thread-safe via `Arc<RwLock<>>`.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, RwLock};

use assetsync_common::AssetCategory;
use url::Url;

use crate::{AssetPathResolver, LocalPresence, StorageError};

type AssetKey = (AssetCategory, String);

/// A recorded store call for test assertions
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedStoreCall {
    ExistsLocally(AssetCategory, String),
    Resolve(AssetCategory, String),
}

/// Mock content store.
///
/// Assets marked local resolve immediately; assets marked downloadable resolve
/// and become local; everything else fails with `NotFound`.
#[derive(Debug, Clone, Default)]
pub struct MockAssetStore {
    local: Arc<RwLock<HashSet<AssetKey>>>,
    downloadable: Arc<RwLock<HashSet<AssetKey>>>,
    history: Arc<Mutex<Vec<RecordedStoreCall>>>,
}

impl MockAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an asset as present on disk
    pub fn add_local(&self, category: AssetCategory, path: &str) {
        self.local
            .write()
            .unwrap()
            .insert((category, path.to_string()));
    }

    /// Remove an asset from disk
    pub fn remove_local(&self, category: AssetCategory, path: &str) {
        self.local
            .write()
            .unwrap()
            .remove(&(category, path.to_string()));
    }

    /// Allow an asset to be materialized by `resolve`
    pub fn add_downloadable(&self, category: AssetCategory, path: &str) {
        self.downloadable
            .write()
            .unwrap()
            .insert((category, path.to_string()));
    }

    /// Make every resolve of an asset fail again
    pub fn remove_downloadable(&self, category: AssetCategory, path: &str) {
        self.downloadable
            .write()
            .unwrap()
            .remove(&(category, path.to_string()));
    }

    /// Get recorded calls
    pub fn recorded_calls(&self) -> Vec<RecordedStoreCall> {
        self.history.lock().unwrap().clone()
    }

    /// Number of resolve calls made so far
    pub fn resolve_count(&self) -> usize {
        self.recorded_calls()
            .iter()
            .filter(|c| matches!(c, RecordedStoreCall::Resolve(..)))
            .count()
    }

    fn record(&self, call: RecordedStoreCall) {
        if let Ok(mut history) = self.history.lock() {
            history.push(call);
        }
    }

    fn is_local(&self, key: &AssetKey) -> bool {
        self.local
            .read()
            .map(|local| local.contains(key))
            .unwrap_or(false)
    }
}

impl LocalPresence for MockAssetStore {
    fn exists_locally(&self, category: AssetCategory, path: &str) -> bool {
        self.record(RecordedStoreCall::ExistsLocally(category, path.to_string()));
        self.is_local(&(category, path.to_string()))
    }
}

#[async_trait::async_trait]
impl AssetPathResolver for MockAssetStore {
    async fn resolve(&self, category: AssetCategory, path: &str) -> Result<Url, StorageError> {
        self.record(RecordedStoreCall::Resolve(category, path.to_string()));
        let key = (category, path.to_string());

        if !self.is_local(&key) {
            let downloadable = self
                .downloadable
                .read()
                .map_err(|e| StorageError::Io(format!("mock lock poisoned: {e}")))?
                .contains(&key);
            if !downloadable {
                return Err(StorageError::NotFound {
                    category,
                    path: path.to_string(),
                });
            }
            tracing::debug!(%category, path, "Mock store: materializing asset");
            self.local
                .write()
                .map_err(|e| StorageError::Io(format!("mock lock poisoned: {e}")))?
                .insert(key);
        }

        Url::parse(&format!("mock://content/{}/{}", category, path))
            .map_err(|e| StorageError::InvalidPath(e.to_string()))
    }
}
