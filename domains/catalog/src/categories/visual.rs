//! Visual category: images and animations shown to the user

use std::hash::{Hash, Hasher};

use assetsync_common::AssetCategory;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::profile::{parse_json_manifest, AssetDefinition, CategoryProfile};
use crate::error::CatalogError;
use crate::repository::AssetCatalog;

/// Visual catalog entry.
///
/// `alt`, `categories` and `groups` are descriptive only; two definitions with
/// the same id and path are the same entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualAssetDefinition {
    pub id: String,
    pub path: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub categories: Vec<u32>,
    #[serde(default)]
    pub groups: Vec<String>,
}

impl VisualAssetDefinition {
    pub fn new(id: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            alt: String::new(),
            categories: Vec::new(),
            groups: Vec::new(),
        }
    }

    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = alt.into();
        self
    }
}

impl PartialEq for VisualAssetDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.path == other.path
    }
}

impl Eq for VisualAssetDefinition {}

impl Hash for VisualAssetDefinition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.path.hash(state);
    }
}

impl AssetDefinition for VisualAssetDefinition {
    fn id(&self) -> &str {
        &self.id
    }

    fn path(&self) -> &str {
        &self.path
    }
}

/// A viewable image at a local URL
#[derive(Debug, Clone, PartialEq)]
pub struct VisualContent {
    pub id: String,
    pub file_path: Url,
    pub alt: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct VisualProfile;

impl CategoryProfile for VisualProfile {
    type Definition = VisualAssetDefinition;
    type Resolved = VisualContent;

    fn category(&self) -> AssetCategory {
        AssetCategory::Visuals
    }

    fn parse_definitions(&self, raw: &[u8]) -> Result<Vec<Self::Definition>, CatalogError> {
        parse_json_manifest(raw)
    }

    fn to_resolved(&self, definition: &Self::Definition, url: Url) -> Self::Resolved {
        VisualContent {
            id: definition.id.clone(),
            file_path: url,
            alt: definition.alt.clone(),
        }
    }
}

pub type VisualCatalog = AssetCatalog<VisualProfile>;
