//! Assetsync Content Storage
//!
//! Answers "is this asset already on disk?" and turns a category-relative asset
//! path into a concrete local URL, downloading it first when necessary:
//! - `ContentStore`: filesystem layout `{root}/{category}/{path}`
//! - `StoreResolver`: local-or-download path resolution
//! - `DirectoryIndex`: rescannable listing of one category directory
//! - Mock store for testing

pub mod index;
pub mod local;
pub mod mock;

use std::path::PathBuf;
use std::time::Duration;

use assetsync_common::{AssetCategory, Config};
use thiserror::Error;
use url::Url;

pub use index::{DirectoryIndex, DirectoryRescan};
pub use local::{ContentStore, StoreResolver};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage configuration error: {0}")]
    Configuration(String),

    #[error("Invalid asset path: {0}")]
    InvalidPath(String),

    #[error("Storage I/O error: {0}")]
    Io(String),

    #[error("Asset download error: {0}")]
    Download(String),

    #[error("Asset not found: {category}/{path}")]
    NotFound {
        category: AssetCategory,
        path: String,
    },
}

/// Content storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub content_root: PathBuf,
    /// Where missing assets are downloaded from; `None` serves local files only
    pub content_base_url: Option<Url>,
    pub download_timeout: Duration,
}

impl StorageConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            content_root: config.content_root.clone(),
            content_base_url: config.content_base_url.clone(),
            download_timeout: config.fetch_timeout,
        }
    }
}

/// Determines whether an asset already exists in local storage
pub trait LocalPresence: Send + Sync {
    fn exists_locally(&self, category: AssetCategory, path: &str) -> bool;
}

/// Resolves an asset path to a concrete local URL
#[async_trait::async_trait]
pub trait AssetPathResolver: Send + Sync {
    /// Return a local URL for the asset, materializing it if it is not on disk yet.
    async fn resolve(&self, category: AssetCategory, path: &str) -> Result<Url, StorageError>;
}
