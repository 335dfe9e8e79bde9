//! Assetsync application composition root
//!
//! Wires the manifest source, content store and both category catalogs to one
//! lifecycle bus.

use std::sync::Arc;

use assetsync_catalog::{
    AudibleCatalog, AudibleProfile, CatalogSummary, LifecycleBus, LocalContentPrimer, PrimeError,
    RefreshCoordinator, RefreshHandle, VisualCatalog, VisualProfile,
};
use assetsync_common::{AssetCategory, Config};
use assetsync_manifest::{ManifestConfig, ManifestSource, ManifestSourceFactory};
use assetsync_storage::{DirectoryIndex, StorageConfig, StoreResolver};

/// Running catalogs plus the handles that keep them current
pub struct AssetSync {
    visuals: Arc<VisualCatalog>,
    audible: Arc<AudibleCatalog>,
    primer: LocalContentPrimer,
    bus: LifecycleBus,
    handles: Vec<RefreshHandle>,
}

impl AssetSync {
    /// Build every collaborator from config, run the initial loads and prime
    /// visual local content.
    pub async fn bootstrap(config: &Config) -> anyhow::Result<Self> {
        let manifests = ManifestSourceFactory::create(ManifestConfig::from_config(config))?;
        Self::bootstrap_with(config, Arc::from(manifests)).await
    }

    /// Same as `bootstrap` with a caller-supplied manifest source
    pub async fn bootstrap_with(
        config: &Config,
        manifests: Arc<dyn ManifestSource>,
    ) -> anyhow::Result<Self> {
        let resolver = Arc::new(StoreResolver::new(StorageConfig::from_config(config))?);
        let store = resolver.store().clone();

        // Visual presence is the rescannable listing backed by the filesystem
        let visual_index = Arc::new(DirectoryIndex::new(&store, AssetCategory::Visuals));

        let visuals = Arc::new(VisualCatalog::new(
            VisualProfile,
            manifests.clone(),
            visual_index.clone(),
            resolver.clone(),
        ));
        let audible = Arc::new(AudibleCatalog::new(
            AudibleProfile,
            manifests,
            Arc::new(store),
            resolver,
        ));

        let bus = LifecycleBus::default();
        let handles = vec![
            RefreshCoordinator::new(visuals.clone())
                .start(bus.subscribe())
                .await,
            RefreshCoordinator::new(audible.clone())
                .start(bus.subscribe())
                .await,
        ];

        let sync = Self {
            primer: LocalContentPrimer::new(visual_index, visuals.clone()),
            visuals,
            audible,
            bus,
            handles,
        };

        if let Err(e) = sync.prime_local().await {
            tracing::warn!(error = %e, "Visual content priming failed; local view may be stale");
        }

        for summary in sync.summaries() {
            tracing::info!(%summary, "Catalog ready");
        }

        Ok(sync)
    }

    pub fn visuals(&self) -> &Arc<VisualCatalog> {
        &self.visuals
    }

    pub fn audible(&self) -> &Arc<AudibleCatalog> {
        &self.audible
    }

    pub fn bus(&self) -> &LifecycleBus {
        &self.bus
    }

    /// Rescan the visual directory, then refresh the visual local view
    pub async fn prime_local(&self) -> Result<(), PrimeError> {
        self.primer.prime_and_wait().await
    }

    /// Notify every coordinator to reload its manifest
    pub fn publish_update(&self) -> usize {
        self.bus.publish_update()
    }

    /// One daemon cycle: pick up files downloaded since the last cycle, then
    /// ask every catalog to reload.
    pub async fn check_for_updates(&self) -> usize {
        if let Err(e) = self.prime_local().await {
            tracing::warn!(error = %e, "Visual content priming failed");
        }
        self.publish_update()
    }

    pub fn summaries(&self) -> Vec<CatalogSummary> {
        vec![self.visuals.summary(), self.audible.summary()]
    }

    /// Stop every refresh listener, waiting for in-flight refreshes
    pub async fn shutdown(self) {
        for handle in self.handles {
            handle.shutdown().await;
        }
        tracing::info!("Refresh listeners stopped");
    }
}
