//! Output persistence for NMC.
//!
//! Two traits decouple the renderer from where its output lands:
//!
//! - [`AssetWriter`]: materializes a remote file (an image) and returns the
//!   path a Markdown page should link to
//! - [`PageWriter`]: stores a rendered Markdown page
//!
//! # Implementations
//!
//! - [`FsAssetWriter`] / [`FsPageWriter`]: filesystem backends
//! - [`MockAssetWriter`] / [`MockPageWriter`]: in-memory recorders for tests
//!   (behind `mock` feature flag)

mod asset;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod page;

use std::path::{Path, PathBuf};

pub use asset::{FsAssetWriter, asset_file_name};
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockAssetWriter, MockPageWriter};
pub use page::FsPageWriter;

/// Materializes remote files referenced by blocks.
///
/// Implementations must tolerate the same block being downloaded more than
/// once in a render pass.
pub trait AssetWriter: Send + Sync {
    /// Download `url` for the block `owner_block_id`.
    ///
    /// Returns the path to link from a page, relative to the output directory
    /// and using `/` separators.
    fn download(&self, url: &str, owner_block_id: &str) -> Result<String, StorageError>;
}

/// Persists rendered pages.
pub trait PageWriter: Send + Sync {
    /// Write `contents` at `relative_path` below the output root.
    ///
    /// Returns the path that was written.
    fn write(&self, relative_path: &Path, contents: &str) -> Result<PathBuf, StorageError>;
}

/// Storage error.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Download request failed (network error, timeout, body too large).
    #[error("Download request failed: {0}")]
    Request(#[from] ureq::Error),

    /// Download returned an error status.
    #[error("Download of {url} failed with HTTP {status}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Requested URL.
        url: String,
    },
}
