//! Mock Manifest Source Implementation
//!
//! Programmable manifest source for testing catalog workflows:
//! - `MockManifestSource`: per-category, per-cache-mode responses with call recording
//! - `MockManifest`: unavailable, a manifest body, or a transport failure

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use assetsync_common::AssetCategory;
use url::Url;

use crate::{CacheMode, ManifestError, ManifestLocation, ManifestSource};

/// What the mock serves for one category and cache mode
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MockManifest {
    /// No location can be resolved
    #[default]
    Unavailable,
    /// Location resolves and fetch returns these bytes
    Body(Vec<u8>),
    /// Location resolves but fetch fails
    Failure(String),
}

impl MockManifest {
    /// Serve a JSON value as the manifest body
    pub fn json(value: serde_json::Value) -> Self {
        MockManifest::Body(value.to_string().into_bytes())
    }
}

/// A recorded call for test assertions
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedManifestCall {
    Resolve(AssetCategory),
    ForceResolve(AssetCategory),
    Fetch(AssetCategory, CacheMode),
}

/// Mock manifest source with programmable responses
#[derive(Debug, Clone, Default)]
pub struct MockManifestSource {
    responses: Arc<RwLock<HashMap<(AssetCategory, CacheMode), MockManifest>>>,
    history: Arc<Mutex<Vec<RecordedManifestCall>>>,
}

impl MockManifestSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve the same response for cached and forced resolution
    pub fn set_manifest(&self, category: AssetCategory, manifest: MockManifest) {
        let mut responses = self.responses.write().unwrap();
        responses.insert((category, CacheMode::Default), manifest.clone());
        responses.insert((category, CacheMode::Bypass), manifest);
    }

    /// Serve a response for forced resolution only
    pub fn set_forced_manifest(&self, category: AssetCategory, manifest: MockManifest) {
        self.responses
            .write()
            .unwrap()
            .insert((category, CacheMode::Bypass), manifest);
    }

    /// Get recorded calls
    pub fn recorded_calls(&self) -> Vec<RecordedManifestCall> {
        self.history.lock().unwrap().clone()
    }

    /// Clear history
    pub fn reset_history(&self) {
        self.history.lock().unwrap().clear();
    }

    fn record(&self, call: RecordedManifestCall) -> Result<(), ManifestError> {
        self.history
            .lock()
            .map_err(|e| ManifestError::Request(format!("history lock poisoned: {e}")))?
            .push(call);
        Ok(())
    }

    fn response(&self, category: AssetCategory, mode: CacheMode) -> MockManifest {
        self.responses
            .read()
            .map(|responses| responses.get(&(category, mode)).cloned().unwrap_or_default())
            .unwrap_or_default()
    }

    fn locate(
        &self,
        category: AssetCategory,
        cache_mode: CacheMode,
    ) -> Result<ManifestLocation, ManifestError> {
        if self.response(category, cache_mode) == MockManifest::Unavailable {
            return Err(ManifestError::Unavailable(category));
        }

        let url = Url::parse(&format!("mock://manifests/{}", category.manifest_path()))
            .map_err(|e| ManifestError::Configuration(e.to_string()))?;
        Ok(ManifestLocation {
            category,
            url,
            cache_mode,
        })
    }
}

#[async_trait::async_trait]
impl ManifestSource for MockManifestSource {
    async fn resolve(&self, category: AssetCategory) -> Result<ManifestLocation, ManifestError> {
        self.record(RecordedManifestCall::Resolve(category))?;
        self.locate(category, CacheMode::Default)
    }

    async fn force_resolve(
        &self,
        category: AssetCategory,
    ) -> Result<ManifestLocation, ManifestError> {
        self.record(RecordedManifestCall::ForceResolve(category))?;
        self.locate(category, CacheMode::Bypass)
    }

    async fn fetch(&self, location: &ManifestLocation) -> Result<Vec<u8>, ManifestError> {
        self.record(RecordedManifestCall::Fetch(
            location.category,
            location.cache_mode,
        ))?;

        tracing::debug!(category = %location.category, "Mock manifest: serving fetch");

        match self.response(location.category, location.cache_mode) {
            MockManifest::Body(bytes) => Ok(bytes),
            MockManifest::Failure(message) => Err(ManifestError::Request(message)),
            MockManifest::Unavailable => Err(ManifestError::Unavailable(location.category)),
        }
    }
}
