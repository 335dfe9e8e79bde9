//! Assetsync Manifest Source
//!
//! Resolves and fetches the remotely published manifest of each asset category:
//! - HTTP manifest client with an on-disk manifest cache for production
//! - Mock manifest source for testing and development
//! - Cached vs forced (cache-bypassing) resolution

pub mod client;
pub mod mock;

use std::path::PathBuf;
use std::time::Duration;

use assetsync_common::{AssetCategory, Config};
use thiserror::Error;
use url::Url;

const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Manifest configuration error: {0}")]
    Configuration(String),

    #[error("Manifest unavailable for category '{0}'")]
    Unavailable(AssetCategory),

    #[error("Manifest request error: {0}")]
    Request(String),

    #[error("Manifest request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Manifest response error: {0}")]
    Response(String),
}

/// Whether a fetch may be served from the transport-level cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CacheMode {
    #[default]
    Default,
    /// Always go to the origin (forced refresh)
    Bypass,
}

/// A fetchable manifest location for one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestLocation {
    pub category: AssetCategory,
    pub url: Url,
    pub cache_mode: CacheMode,
}

/// Manifest source configuration
#[derive(Clone)]
pub struct ManifestConfig {
    /// Manifest provider (http, mock)
    pub provider: String,
    /// Base URL of the manifest API
    pub api_base_url: Url,
    /// Directory holding the last fetched manifest of each category
    pub cache_dir: PathBuf,
    /// Age after which a cached manifest is refetched on a normal resolve
    pub cache_ttl: Duration,
    /// Bound applied to every manifest request
    pub timeout: Duration,
}

impl std::fmt::Debug for ManifestConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManifestConfig")
            .field("provider", &self.provider)
            .field(
                "api_base_url",
                &assetsync_common::config::redact(&self.api_base_url),
            )
            .field("cache_dir", &self.cache_dir)
            .field("cache_ttl", &self.cache_ttl)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ManifestConfig {
    /// Derive manifest config from the process config and `MANIFEST_PROVIDER`
    pub fn from_config(config: &Config) -> Self {
        let provider = std::env::var("MANIFEST_PROVIDER").unwrap_or_else(|_| "http".to_string());

        Self {
            provider,
            api_base_url: config.api_base_url.clone(),
            cache_dir: config.manifest_cache_dir.clone(),
            cache_ttl: DEFAULT_CACHE_TTL,
            timeout: config.fetch_timeout,
        }
    }

    /// Create manifest config from environment variables
    pub fn from_env() -> Result<Self, ManifestError> {
        let config =
            Config::from_env().map_err(|e| ManifestError::Configuration(e.to_string()))?;
        Ok(Self::from_config(&config))
    }
}

/// Manifest source trait for different transports
#[async_trait::async_trait]
pub trait ManifestSource: Send + Sync {
    /// Resolve the manifest location of a category; fetches may be cached.
    async fn resolve(&self, category: AssetCategory) -> Result<ManifestLocation, ManifestError>;

    /// Resolve the manifest location of a category, bypassing any cache.
    async fn force_resolve(
        &self,
        category: AssetCategory,
    ) -> Result<ManifestLocation, ManifestError>;

    /// Fetch the raw manifest bytes at a resolved location.
    async fn fetch(&self, location: &ManifestLocation) -> Result<Vec<u8>, ManifestError>;
}

/// Factory for creating ManifestSource implementations
pub struct ManifestSourceFactory;

impl ManifestSourceFactory {
    pub fn create(config: ManifestConfig) -> Result<Box<dyn ManifestSource>, ManifestError> {
        match config.provider.as_str() {
            "http" => {
                tracing::info!("Creating HTTP manifest source");
                Ok(Box::new(client::HttpManifestSource::new(config)?))
            }
            "mock" => {
                tracing::info!("Creating mock manifest source");
                Ok(Box::new(mock::MockManifestSource::new()))
            }
            provider => Err(ManifestError::Configuration(format!(
                "Unknown manifest provider: {}. Supported providers: http, mock",
                provider
            ))),
        }
    }
}
