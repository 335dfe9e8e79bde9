//! Directory index for one category
//!
//! Keeps the set of asset paths found under a category directory at the time of
//! the last rescan. Presence checks are answered from memory first; a miss is
//! confirmed against the filesystem, so files written after the last rescan
//! (downloads in particular) are still reported and join the listing.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use assetsync_common::AssetCategory;
use walkdir::WalkDir;

use crate::{ContentStore, LocalPresence, StorageError};

/// Rebuilds a local directory listing; synchronous and blocking
pub trait DirectoryRescan: Send + Sync {
    fn run(&self) -> Result<(), StorageError>;
}

#[derive(Debug)]
pub struct DirectoryIndex {
    category: AssetCategory,
    store: ContentStore,
    dir: PathBuf,
    entries: RwLock<HashSet<String>>,
}

impl DirectoryIndex {
    /// Index the category directory of a content store. Starts empty.
    pub fn new(store: &ContentStore, category: AssetCategory) -> Self {
        Self {
            category,
            store: store.clone(),
            dir: store.category_dir(category),
            entries: RwLock::new(HashSet::new()),
        }
    }

    pub fn category(&self) -> AssetCategory {
        self.category
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(normalize(path))
    }

    /// Walk the category directory and replace the listing.
    pub fn rescan(&self) -> Result<usize, StorageError> {
        let mut found = HashSet::new();

        if self.dir.is_dir() {
            for entry in WalkDir::new(&self.dir).follow_links(true) {
                let entry = entry.map_err(|e| StorageError::Io(e.to_string()))?;
                if !entry.file_type().is_file() {
                    continue;
                }
                if let Some(relative) = relative_key(&self.dir, entry.path()) {
                    found.insert(relative);
                }
            }
        }

        let count = found.len();
        *self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner) = found;

        tracing::info!(category = %self.category, assets = count, "Local directory rescanned");
        Ok(count)
    }
}

/// Forward-slash path relative to the indexed directory
fn relative_key(dir: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(dir).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

fn normalize(path: &str) -> &str {
    path.trim_start_matches("./")
}

impl DirectoryRescan for DirectoryIndex {
    fn run(&self) -> Result<(), StorageError> {
        self.rescan().map(|_| ())
    }
}

impl LocalPresence for DirectoryIndex {
    fn exists_locally(&self, category: AssetCategory, path: &str) -> bool {
        if category != self.category {
            return false;
        }
        if self.contains(path) {
            return true;
        }
        if !self.store.exists_locally(category, path) {
            return false;
        }
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(normalize(path).to_string());
        true
    }
}
