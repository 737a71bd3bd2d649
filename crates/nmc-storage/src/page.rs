//! Filesystem page writer.

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::{PageWriter, StorageError};

/// [`PageWriter`] that writes pages below a root directory.
pub struct FsPageWriter {
    root: PathBuf,
}

impl FsPageWriter {
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

impl PageWriter for FsPageWriter {
    fn write(&self, relative_path: &Path, contents: &str) -> Result<PathBuf, StorageError> {
        // Pages never escape the root.
        if relative_path
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("page path must be relative: {}", relative_path.display()),
            )));
        }

        let path = self.root.join(relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        debug!("wrote page {}", path.display());

        Ok(path)
    }
}
