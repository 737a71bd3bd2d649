//! CLI error types.

use nmc_config::ConfigError;
use nmc_renderer::RenderError;
use nmc_storage::StorageError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Render(#[from] RenderError),

    #[error("{0}")]
    Storage(#[from] StorageError),
}
