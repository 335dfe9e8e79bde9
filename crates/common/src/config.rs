//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

const DEFAULT_CONTENT_ROOT: &str = "./assetsync-content";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
const DEFAULT_UPDATE_INTERVAL_SECS: u64 = 3600;
pub const DEFAULT_RUST_LOG: &str = "assetsync=debug";

#[derive(Clone)]
pub struct Config {
    /// Base URL of the manifest API (`{base}/assets/{category}`)
    pub api_base_url: Url,

    /// Base URL asset files are downloaded from (`{base}/{category}/{path}`)
    pub content_base_url: Option<Url>,

    /// Local storage root (`{root}/{category}/{path}`)
    pub content_root: PathBuf,
    pub manifest_cache_dir: PathBuf,

    /// Bound applied to every manifest fetch
    pub fetch_timeout: Duration,
    /// Period between lifecycle update events
    pub update_interval: Duration,

    pub rust_log: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_base_url", &redact(&self.api_base_url))
            .field(
                "content_base_url",
                &self.content_base_url.as_ref().map(redact),
            )
            .field("content_root", &self.content_root)
            .field("manifest_cache_dir", &self.manifest_cache_dir)
            .field("fetch_timeout", &self.fetch_timeout)
            .field("update_interval", &self.update_interval)
            .field("rust_log", &self.rust_log)
            .finish()
    }
}

/// Strip credentials that may be embedded in a URL
pub fn redact(url: &Url) -> String {
    if url.username().is_empty() && url.password().is_none() {
        return url.to_string();
    }
    let mut clean = url.clone();
    let _ = clean.set_username("");
    let _ = clean.set_password(None);
    format!("{} [REDACTED CREDENTIALS]", clean)
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let api_base_url = env::var("ASSETSYNC_API_BASE_URL")
            .map_err(|_| anyhow::anyhow!("ASSETSYNC_API_BASE_URL is required"))?;
        let api_base_url =
            Url::parse(&api_base_url).context("ASSETSYNC_API_BASE_URL is not a valid URL")?;

        let content_base_url = match env::var("ASSETSYNC_CONTENT_BASE_URL") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                Url::parse(&raw).context("ASSETSYNC_CONTENT_BASE_URL is not a valid URL")?,
            ),
            _ => None,
        };

        let content_root = env::var("ASSETSYNC_CONTENT_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONTENT_ROOT));
        let manifest_cache_dir = env::var("ASSETSYNC_MANIFEST_CACHE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| content_root.join(".manifests"));

        let config = Self {
            api_base_url,
            content_base_url,
            content_root,
            manifest_cache_dir,
            fetch_timeout: Duration::from_secs(secs_var(
                "ASSETSYNC_FETCH_TIMEOUT_SECS",
                DEFAULT_FETCH_TIMEOUT_SECS,
            )),
            update_interval: Duration::from_secs(secs_var(
                "ASSETSYNC_UPDATE_INTERVAL_SECS",
                DEFAULT_UPDATE_INTERVAL_SECS,
            )),
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_RUST_LOG.to_string()),
        };

        Ok(config)
    }
}

fn secs_var(name: &str, default: u64) -> u64 {
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(variable = name, value = %raw, default, "Ignoring unparsable duration");
            default
        }),
        Err(_) => default,
    }
}
