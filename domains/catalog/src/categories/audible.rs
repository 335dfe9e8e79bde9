//! Audible category: sound clips played alongside visual content

use assetsync_common::AssetCategory;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::profile::{parse_json_manifest, AssetDefinition, CategoryProfile};
use crate::error::CatalogError;
use crate::repository::AssetCatalog;

/// Audible catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AudibleAssetDefinition {
    pub id: String,
    pub path: String,
}

impl AudibleAssetDefinition {
    pub fn new(id: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
        }
    }
}

impl AssetDefinition for AudibleAssetDefinition {
    fn id(&self) -> &str {
        &self.id
    }

    fn path(&self) -> &str {
        &self.path
    }
}

/// A playable sound at a local URL
#[derive(Debug, Clone, PartialEq)]
pub struct AudibleContent {
    pub id: String,
    pub file_path: Url,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AudibleProfile;

impl CategoryProfile for AudibleProfile {
    type Definition = AudibleAssetDefinition;
    type Resolved = AudibleContent;

    fn category(&self) -> AssetCategory {
        AssetCategory::Audible
    }

    fn parse_definitions(&self, raw: &[u8]) -> Result<Vec<Self::Definition>, CatalogError> {
        parse_json_manifest(raw)
    }

    fn to_resolved(&self, definition: &Self::Definition, url: Url) -> Self::Resolved {
        AudibleContent {
            id: definition.id.clone(),
            file_path: url,
        }
    }
}

pub type AudibleCatalog = AssetCatalog<AudibleProfile>;
