//! Asset catalog: the partitioned, queryable view of one category's manifest
//!
//! Writers (`load`, `resolve`, `rescan_local`) are serialized behind one gate per
//! catalog and publish a complete new snapshot; readers clone the current
//! snapshot and never block on a writer's I/O.

use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};

use assetsync_common::AssetCategory;
use assetsync_manifest::{ManifestError, ManifestLocation, ManifestSource};
use assetsync_storage::{AssetPathResolver, LocalPresence};
use chrono::Utc;
use tokio::sync::Mutex;

use crate::domain::entities::{CatalogSnapshot, CatalogSummary, LoadKind, LoadOutcome};
use crate::domain::profile::{AssetDefinition, CategoryProfile};
use crate::domain::state::{CatalogEvent, CatalogStateMachine, CatalogStatus};
use crate::error::CatalogError;

pub struct AssetCatalog<P: CategoryProfile> {
    profile: P,
    manifests: Arc<dyn ManifestSource>,
    presence: Arc<dyn LocalPresence>,
    resolver: Arc<dyn AssetPathResolver>,
    writer: Mutex<()>,
    state: RwLock<Arc<CatalogSnapshot<P::Definition>>>,
}

impl<P: CategoryProfile> AssetCatalog<P> {
    /// Create an unloaded catalog (status `Unknown`).
    pub fn new(
        profile: P,
        manifests: Arc<dyn ManifestSource>,
        presence: Arc<dyn LocalPresence>,
        resolver: Arc<dyn AssetPathResolver>,
    ) -> Self {
        Self {
            profile,
            manifests,
            presence,
            resolver,
            writer: Mutex::new(()),
            state: RwLock::new(Arc::new(CatalogSnapshot::default())),
        }
    }

    pub fn category(&self) -> AssetCategory {
        self.profile.category()
    }

    pub fn profile(&self) -> &P {
        &self.profile
    }

    pub(crate) fn manifests(&self) -> &Arc<dyn ManifestSource> {
        &self.manifests
    }

    pub fn status(&self) -> CatalogStatus {
        self.snapshot().status
    }

    /// The current snapshot, consistent across all views
    pub fn snapshot(&self) -> Arc<CatalogSnapshot<P::Definition>> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn publish(&self, next: CatalogSnapshot<P::Definition>) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(next);
    }

    pub fn summary(&self) -> CatalogSummary {
        let snapshot = self.snapshot();
        CatalogSummary {
            category: self.category(),
            status: snapshot.status,
            total: snapshot.all.len(),
            local: snapshot.local.len(),
            remote_only: snapshot.remote_only().len(),
        }
    }

    /// Every definition, local and remote-only, in manifest order
    pub fn supply_all_definitions(&self) -> Vec<P::Definition> {
        self.snapshot().all.clone()
    }

    pub fn supply_all_local_definitions(&self) -> HashSet<P::Definition> {
        self.snapshot().local.clone()
    }

    /// Definitions without a local file, in manifest order
    pub fn supply_all_remote_only_definitions(&self) -> Vec<P::Definition> {
        self.snapshot().remote_only()
    }

    pub fn supply_preferred_local_definitions(&self) -> HashSet<P::Definition> {
        self.profile
            .preferred_local(self.supply_all_local_definitions())
    }

    pub fn supply_preferred_remote_definitions(&self) -> Vec<P::Definition> {
        self.profile.preferred_remote(self.supply_all_definitions())
    }

    /// Fetch, parse and partition a manifest, then apply the outcome.
    ///
    /// Never fails: a transport or parse failure breaks an `Initial` load and is
    /// ignored by a `Refresh`. The presence checks (one per definition) run on
    /// the blocking pool.
    pub async fn load(
        &self,
        location: Result<ManifestLocation, ManifestError>,
        kind: LoadKind,
    ) -> LoadOutcome {
        let _writer = self.writer.lock().await;
        let category = self.category();

        let definitions = match self.fetch_definitions(location).await {
            Ok(definitions) => definitions,
            Err(e) => return self.apply_failure(kind, e),
        };

        let presence = Arc::clone(&self.presence);
        let partitioned = tokio::task::spawn_blocking(move || {
            let local = partition(presence.as_ref(), category, &definitions);
            (definitions, local)
        })
        .await;
        let (definitions, local) = match partitioned {
            Ok(partitioned) => partitioned,
            Err(e) => return self.apply_failure(kind, CatalogError::Presence(e.to_string())),
        };
        let (total, local_count) = (definitions.len(), local.len());

        self.publish(CatalogSnapshot {
            status: CatalogStatus::Ok,
            all: definitions,
            local,
            loaded_at: Some(Utc::now()),
        });

        tracing::info!(%category, %kind, total, local = local_count, "Asset catalog loaded");
        LoadOutcome::Loaded {
            total,
            local: local_count,
        }
    }

    async fn fetch_definitions(
        &self,
        location: Result<ManifestLocation, ManifestError>,
    ) -> Result<Vec<P::Definition>, CatalogError> {
        let location = location?;
        let raw = self.manifests.fetch(&location).await?;
        self.profile.parse_definitions(&raw)
    }

    fn apply_failure(&self, kind: LoadKind, error: CatalogError) -> LoadOutcome {
        let category = self.category();
        let current = self.status();

        let event = match kind {
            LoadKind::Initial => CatalogEvent::InitialLoadFailed,
            LoadKind::Refresh => CatalogEvent::RefreshFailed,
        };

        match CatalogStateMachine::transition(current, event) {
            Ok(CatalogStatus::Broken) => {
                tracing::error!(%category, error = %error, "Unable to initialize asset catalog");
                self.publish(CatalogSnapshot::broken());
                LoadOutcome::Broken
            }
            Ok(_) => {
                tracing::warn!(%category, error = %error, "Asset catalog refresh failed, keeping last good catalog");
                LoadOutcome::Retained
            }
            Err(e) => {
                // An initial load issued against an already loaded catalog
                tracing::warn!(%category, error = %error, transition = %e, "Keeping loaded catalog after failed initial load");
                LoadOutcome::Retained
            }
        }
    }

    /// Materialize one definition as a local resource.
    ///
    /// On success the resolved content is returned and, if the definition is
    /// listed in `all`, it joins the local view. The insert is not
    /// unconditional: a definition missing from `all` (e.g. dropped by a
    /// refresh since the caller read it) is still returned but stays out of
    /// `local`, so `local` remains a subset of `all`. `all` itself is never
    /// modified. On failure nothing changes.
    pub async fn resolve(&self, definition: &P::Definition) -> Option<P::Resolved> {
        let _writer = self.writer.lock().await;
        let category = self.category();

        let url = match self.resolver.resolve(category, definition.path()).await {
            Ok(url) => url,
            Err(e) => {
                let error = CatalogError::from(e);
                tracing::warn!(%category, id = definition.id(), error = %error, "Unable to resolve asset");
                return None;
            }
        };

        let current = self.snapshot();
        if !current.local.contains(definition) {
            if current.all.contains(definition) {
                let mut next = CatalogSnapshot::clone(&current);
                next.local.insert(definition.clone());
                self.publish(next);
                tracing::debug!(%category, id = definition.id(), "Asset is now local");
            } else {
                tracing::debug!(%category, id = definition.id(), "Resolved asset is not listed in the catalog");
            }
        }

        Some(self.profile.to_resolved(definition, url))
    }

    /// Re-evaluate local presence of the current definitions without refetching
    /// the manifest. No-op unless the catalog is `Ok`.
    ///
    /// Blocks on the writer gate; call it off the async runtime.
    pub fn rescan_local(&self) {
        let _writer = self.writer.blocking_lock();
        let category = self.category();

        let current = self.snapshot();
        if current.status != CatalogStatus::Ok {
            tracing::debug!(%category, status = %current.status, "Skipping local rescan");
            return;
        }

        let local = partition(self.presence.as_ref(), category, &current.all);
        let count = local.len();
        self.publish(CatalogSnapshot {
            status: current.status,
            all: current.all.clone(),
            local,
            loaded_at: current.loaded_at,
        });

        tracing::info!(%category, local = count, "Local assets refreshed");
    }
}

fn partition<D: AssetDefinition>(
    presence: &dyn LocalPresence,
    category: AssetCategory,
    definitions: &[D],
) -> HashSet<D> {
    definitions
        .iter()
        .filter(|definition| presence.exists_locally(category, definition.path()))
        .cloned()
        .collect()
}
