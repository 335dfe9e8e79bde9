//! Catalog domain: per-category asset catalogs, refresh lifecycle, local content priming

pub mod categories;
pub mod domain;
pub mod error;
pub mod repository;
pub mod sync;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{CatalogSnapshot, CatalogSummary, LoadKind, LoadOutcome};
pub use domain::profile::{AssetDefinition, CategoryProfile};
pub use domain::state::{CatalogEvent, CatalogStateMachine, CatalogStatus, StateError};
pub use error::CatalogError;

// Re-export category types
pub use categories::audible::{AudibleAssetDefinition, AudibleCatalog, AudibleContent, AudibleProfile};
pub use categories::visual::{VisualAssetDefinition, VisualCatalog, VisualContent, VisualProfile};

// Re-export repository and lifecycle types
pub use repository::AssetCatalog;
pub use sync::lifecycle::{LifecycleBus, LifecycleEvent, LifecycleSubscription};
pub use sync::primer::{LocalContentPrimer, PrimeError, RepositoryLocalRefresh};
pub use sync::refresh::{RefreshCoordinator, RefreshHandle};
