//! Local content priming
//!
//! Rescans a content directory, then re-evaluates a catalog's local partition
//! against the fresh listing. The refresh never starts before the rescan has
//! completed.

use std::sync::Arc;

use assetsync_storage::{DirectoryRescan, StorageError};
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::domain::profile::CategoryProfile;
use crate::repository::AssetCatalog;

/// Second priming step: re-check local presence for loaded definitions.
///
/// Synchronous and blocking; invoked from a blocking worker.
pub trait RepositoryLocalRefresh: Send + Sync {
    fn run(&self);
}

impl<P: CategoryProfile> RepositoryLocalRefresh for AssetCatalog<P> {
    fn run(&self) {
        self.rescan_local();
    }
}

#[derive(Debug, Error)]
pub enum PrimeError {
    #[error("Directory rescan failed: {0}")]
    Rescan(#[from] StorageError),

    #[error("Priming task failed: {0}")]
    Join(String),
}

#[derive(Clone)]
pub struct LocalContentPrimer {
    rescan: Arc<dyn DirectoryRescan>,
    refresh: Arc<dyn RepositoryLocalRefresh>,
}

impl LocalContentPrimer {
    pub fn new(rescan: Arc<dyn DirectoryRescan>, refresh: Arc<dyn RepositoryLocalRefresh>) -> Self {
        Self { rescan, refresh }
    }

    /// Run rescan then local refresh on a blocking worker, then `on_complete`.
    ///
    /// `on_complete` runs even when the rescan fails; the refresh does not.
    pub fn prime<F>(&self, on_complete: F) -> JoinHandle<Result<(), PrimeError>>
    where
        F: FnOnce() + Send + 'static,
    {
        let rescan = Arc::clone(&self.rescan);
        let refresh = Arc::clone(&self.refresh);

        tokio::task::spawn_blocking(move || {
            let result = rescan.run();
            match &result {
                Ok(()) => {
                    refresh.run();
                    tracing::info!("Local content primed");
                }
                Err(e) => {
                    tracing::error!(error = %e, "Local content rescan failed, skipping local refresh");
                }
            }
            on_complete();
            result.map_err(PrimeError::from)
        })
    }

    pub async fn prime_and_wait(&self) -> Result<(), PrimeError> {
        self.prime(|| {})
            .await
            .map_err(|e| PrimeError::Join(e.to_string()))?
    }
}
