//! Filesystem asset writer.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};
use ureq::Agent;

use crate::{AssetWriter, StorageError};

/// Download timeout in seconds.
const DOWNLOAD_TIMEOUT: u64 = 60;

/// Largest accepted asset body.
const MAX_ASSET_BYTES: u64 = 50 * 1024 * 1024;

/// File name for the asset of `owner_block_id`: the block id plus the
/// extension of the URL path (`.bin` when there is none).
///
/// ```
/// use nmc_storage::asset_file_name;
///
/// assert_eq!(asset_file_name("https://x/y.png?sig=1", "abc"), "abc.png");
/// assert_eq!(asset_file_name("https://x/download", "abc"), "abc.bin");
/// ```
#[must_use]
pub fn asset_file_name(url: &str, owner_block_id: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let last_segment = path.rsplit('/').next().unwrap_or(path);
    let ext = Path::new(last_segment)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map_or_else(|| "bin".to_owned(), str::to_ascii_lowercase);
    format!("{owner_block_id}.{ext}")
}

/// Join a link prefix and a file name with `/`.
pub(crate) fn link_path(prefix: &str, file_name: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        file_name.to_owned()
    } else {
        format!("{prefix}/{file_name}")
    }
}

/// [`AssetWriter`] that downloads over HTTP into a directory.
///
/// Directory layout:
/// ```text
/// {root}/
/// +-- <block-id>.png
/// +-- <block-id>.jpg
/// ```
pub struct FsAssetWriter {
    agent: Agent,
    root: PathBuf,
    link_prefix: String,
}

impl FsAssetWriter {
    /// Create a writer storing files under `root`.
    ///
    /// `link_prefix` is `root` as seen from the page output directory
    /// (e.g. `assets`).
    #[must_use]
    pub fn new(root: PathBuf, link_prefix: impl Into<String>) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DOWNLOAD_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            root,
            link_prefix: link_prefix.into(),
        }
    }

    /// Write `data` as `file_name` under the root.
    fn store(&self, file_name: &str, data: &[u8]) -> Result<PathBuf, StorageError> {
        fs::create_dir_all(&self.root)?;
        let path = self.root.join(file_name);
        fs::write(&path, data)?;
        Ok(path)
    }
}

impl AssetWriter for FsAssetWriter {
    fn download(&self, url: &str, owner_block_id: &str) -> Result<String, StorageError> {
        let file_name = asset_file_name(url, owner_block_id);

        info!("Downloading asset for block {}", owner_block_id);
        debug!("asset url: {url}");

        let response = self.agent.get(url).call()?;
        let status = response.status().as_u16();
        if status >= 400 {
            return Err(StorageError::Http {
                status,
                url: url.to_owned(),
            });
        }

        let data = response
            .into_body()
            .with_config()
            .limit(MAX_ASSET_BYTES)
            .read_to_vec()?;

        let path = self.store(&file_name, &data)?;
        debug!("wrote {} bytes to {}", data.len(), path.display());

        Ok(link_path(&self.link_prefix, &file_name))
    }
}
