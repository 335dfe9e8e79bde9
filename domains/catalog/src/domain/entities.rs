//! Domain entities for the Catalog domain

use std::collections::HashSet;

use assetsync_common::AssetCategory;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::profile::AssetDefinition;
use crate::domain::state::CatalogStatus;

/// Immutable view of one category's catalog.
///
/// Readers hold an `Arc` to a snapshot; writers replace the whole snapshot, so
/// `all` and `local` are always observed together.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot<D> {
    pub status: CatalogStatus,
    /// Every definition in manifest order
    pub all: Vec<D>,
    /// Definitions with a confirmed local file; always a subset of `all`
    pub local: HashSet<D>,
    pub loaded_at: Option<DateTime<Utc>>,
}

impl<D> Default for CatalogSnapshot<D> {
    fn default() -> Self {
        Self {
            status: CatalogStatus::Unknown,
            all: Vec::new(),
            local: HashSet::new(),
            loaded_at: None,
        }
    }
}

impl<D: AssetDefinition> CatalogSnapshot<D> {
    /// Snapshot left behind by a failed initial load
    pub fn broken() -> Self {
        Self {
            status: CatalogStatus::Broken,
            ..Self::default()
        }
    }

    /// Definitions without a local file, in manifest order
    pub fn remote_only(&self) -> Vec<D> {
        self.all
            .iter()
            .filter(|definition| !self.local.contains(definition))
            .cloned()
            .collect()
    }
}

/// Which trigger started a load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    /// First population; failure leaves the catalog broken and empty
    Initial,
    /// Lifecycle-triggered reload; failure leaves the catalog untouched
    Refresh,
}

impl std::fmt::Display for LoadKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initial => write!(f, "initial"),
            Self::Refresh => write!(f, "refresh"),
        }
    }
}

/// What a load did to the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { total: usize, local: usize },
    Broken,
    /// Load failed; previous snapshot kept
    Retained,
}

/// Counts for logging and status displays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogSummary {
    pub category: AssetCategory,
    pub status: CatalogStatus,
    pub total: usize,
    pub local: usize,
    pub remote_only: usize,
}

impl std::fmt::Display for CatalogSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} ({} total, {} local, {} remote-only)",
            self.category, self.status, self.total, self.local, self.remote_only
        )
    }
}
