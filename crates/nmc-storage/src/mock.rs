//! In-memory writers for testing.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::asset::{asset_file_name, link_path};
use crate::{AssetWriter, PageWriter, StorageError};

/// [`AssetWriter`] that records downloads instead of performing them.
///
/// Returns `<prefix>/<block-id>.<ext>` like [`FsAssetWriter`](crate::FsAssetWriter).
#[derive(Debug)]
pub struct MockAssetWriter {
    prefix: String,
    downloads: RwLock<Vec<(String, String)>>,
}

impl MockAssetWriter {
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            downloads: RwLock::new(Vec::new()),
        }
    }

    /// Recorded `(url, owner_block_id)` pairs, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn downloads(&self) -> Vec<(String, String)> {
        self.downloads.read().unwrap().clone()
    }
}

impl AssetWriter for MockAssetWriter {
    fn download(&self, url: &str, owner_block_id: &str) -> Result<String, StorageError> {
        self.downloads
            .write()
            .unwrap()
            .push((url.to_owned(), owner_block_id.to_owned()));
        Ok(link_path(&self.prefix, &asset_file_name(url, owner_block_id)))
    }
}

/// [`PageWriter`] that keeps written pages in memory.
#[derive(Debug, Default)]
pub struct MockPageWriter {
    pages: RwLock<Vec<(PathBuf, String)>>,
}

impl MockPageWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Written `(path, contents)` pairs, in write order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn pages(&self) -> Vec<(PathBuf, String)> {
        self.pages.read().unwrap().clone()
    }

    /// Contents written at `path`, if any.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<String> {
        self.pages
            .read()
            .unwrap()
            .iter()
            .find(|(p, _)| p == path.as_ref())
            .map(|(_, c)| c.clone())
    }
}

impl PageWriter for MockPageWriter {
    fn write(&self, relative_path: &Path, contents: &str) -> Result<PathBuf, StorageError> {
        self.pages
            .write()
            .unwrap()
            .push((relative_path.to_path_buf(), contents.to_owned()));
        Ok(relative_path.to_path_buf())
    }
}
