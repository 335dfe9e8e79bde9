//! Asset categories
//!
//! A category namespaces both the remote manifest location and the local
//! storage directory of the assets it lists.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
#[error("Unknown asset category: {0}")]
pub struct UnknownCategory(pub String);

/// Asset category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetCategory {
    Visuals,
    Audible,
}

impl AssetCategory {
    /// All known categories
    pub const ALL: [AssetCategory; 2] = [AssetCategory::Visuals, AssetCategory::Audible];

    /// Path segment used in manifest URLs and storage directories
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetCategory::Visuals => "visuals",
            AssetCategory::Audible => "audible",
        }
    }

    /// Relative API path of this category's manifest
    pub fn manifest_path(&self) -> String {
        format!("assets/{}", self.as_str())
    }
}

impl std::fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AssetCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "visuals" => Ok(AssetCategory::Visuals),
            "audible" => Ok(AssetCategory::Audible),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}
