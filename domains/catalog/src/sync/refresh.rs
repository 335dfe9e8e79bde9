//! Refresh coordination for one catalog
//!
//! Runs the initial load with cached manifest resolution, then reloads with
//! forced resolution on every lifecycle update. There is no retry: the next
//! update is the retry.

use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::domain::entities::{LoadKind, LoadOutcome};
use crate::domain::profile::CategoryProfile;
use crate::repository::AssetCatalog;
use crate::sync::lifecycle::LifecycleSubscription;

pub struct RefreshCoordinator<P: CategoryProfile> {
    catalog: Arc<AssetCatalog<P>>,
}

impl<P: CategoryProfile> Clone for RefreshCoordinator<P> {
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
        }
    }
}

impl<P: CategoryProfile> RefreshCoordinator<P> {
    pub fn new(catalog: Arc<AssetCatalog<P>>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Arc<AssetCatalog<P>> {
        &self.catalog
    }

    /// First population; may be served from the manifest cache
    pub async fn initial_load(&self) -> LoadOutcome {
        let category = self.catalog.category();
        let location = self.catalog.manifests().resolve(category).await;
        self.catalog.load(location, LoadKind::Initial).await
    }

    /// Reload bypassing the manifest cache
    pub async fn refresh_now(&self) -> LoadOutcome {
        let category = self.catalog.category();
        let location = self.catalog.manifests().force_resolve(category).await;
        self.catalog.load(location, LoadKind::Refresh).await
    }

    /// Run the initial load, then listen for lifecycle updates in the background.
    ///
    /// Updates that arrive while a refresh is running are coalesced into one
    /// further refresh, so at most one refresh is in flight.
    pub async fn start(self, mut subscription: LifecycleSubscription) -> RefreshHandle {
        let category = self.catalog.category();
        let initial = self.initial_load().await;

        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = &mut stop_rx => break,
                    update = subscription.next_update() => {
                        if update.is_none() {
                            tracing::debug!(%category, "Lifecycle bus closed");
                            break;
                        }
                        tracing::debug!(%category, "Lifecycle update received");
                        self.refresh_now().await;
                        while subscription.drain_pending() {
                            self.refresh_now().await;
                        }
                    }
                }
            }
            tracing::debug!(%category, "Refresh listener stopped");
        });

        RefreshHandle {
            initial,
            stop: Some(stop_tx),
            task: Some(task),
        }
    }
}

/// Owns a running refresh listener. Dropping the handle aborts the listener.
#[derive(Debug)]
pub struct RefreshHandle {
    initial: LoadOutcome,
    stop: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl RefreshHandle {
    /// Outcome of the initial load run by `start`
    pub fn initial_outcome(&self) -> LoadOutcome {
        self.initial
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Stop listening and wait for an in-flight refresh to finish.
    ///
    /// The subscription is dropped before this returns.
    pub async fn shutdown(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Refresh listener ended abnormally");
            }
        }
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
