//! Repository implementations for the Catalog domain

pub mod catalog;

pub use catalog::AssetCatalog;
