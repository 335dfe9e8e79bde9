//! Category capabilities
//!
//! A catalog is generic over a `CategoryProfile`, which supplies everything
//! category-specific: the definition and resolved types, manifest decoding,
//! materialization, and the preferred-selection policies.

use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

use assetsync_common::AssetCategory;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::CatalogError;

/// One catalog entry. Equality and hashing cover exactly the id and path.
pub trait AssetDefinition: Clone + Eq + Hash + Debug + Send + Sync + 'static {
    fn id(&self) -> &str;

    /// Storage path relative to the category directory
    fn path(&self) -> &str;
}

pub trait CategoryProfile: Send + Sync + 'static {
    type Definition: AssetDefinition;
    type Resolved: Send;

    fn category(&self) -> AssetCategory;

    /// Decode raw manifest bytes into definitions, preserving manifest order.
    fn parse_definitions(&self, raw: &[u8]) -> Result<Vec<Self::Definition>, CatalogError>;

    /// Build the materialized asset for a definition at a local URL.
    fn to_resolved(&self, definition: &Self::Definition, url: Url) -> Self::Resolved;

    /// Narrow the local view. Must return a subset of `local`.
    fn preferred_local(
        &self,
        local: HashSet<Self::Definition>,
    ) -> HashSet<Self::Definition> {
        local
    }

    /// Narrow the full definition list. Must return a subset of `all`.
    fn preferred_remote(&self, all: Vec<Self::Definition>) -> Vec<Self::Definition> {
        all
    }
}

/// Decode a manifest that is a JSON array of definition objects
pub fn parse_json_manifest<D: DeserializeOwned>(raw: &[u8]) -> Result<Vec<D>, CatalogError> {
    serde_json::from_slice(raw).map_err(|e| CatalogError::Parse(e.to_string()))
}
