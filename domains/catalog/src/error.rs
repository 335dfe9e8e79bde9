//! Catalog error taxonomy
//!
//! None of these escape `load` or `resolve`; they are logged with category
//! context and folded into the resulting state.

use assetsync_manifest::ManifestError;
use assetsync_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Manifest unreachable, unavailable, or timed out
    #[error("Manifest transport failure: {0}")]
    Transport(#[from] ManifestError),

    /// Manifest bytes present but not decodable into definitions
    #[error("Manifest parse failure: {0}")]
    Parse(String),

    /// A single definition could not be materialized locally
    #[error("Asset resolution failure: {0}")]
    Resolution(#[from] StorageError),

    /// The blocking presence pass did not complete
    #[error("Local presence check failed: {0}")]
    Presence(String),
}
