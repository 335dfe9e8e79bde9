//! Shared types and configuration for Assetsync
//!
//! This crate provides functionality used across the Assetsync workspace:
//! - Asset categories that namespace manifests and local storage
//! - Configuration management following 12-factor principles

pub mod category;
pub mod config;

pub use category::{AssetCategory, UnknownCategory};
pub use config::Config;
