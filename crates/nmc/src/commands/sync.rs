//! `nmc sync` command implementation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use nmc_config::{CliSettings, SyncConfig};
use nmc_notion::NotionClient;
use nmc_renderer::{Renderer, SyncSummary};
use nmc_storage::{FsAssetWriter, FsPageWriter, PageWriter};
use tracing::info;

use crate::error::CliError;
use crate::output::Output;

/// File name of the rendered view index.
const INDEX_FILE: &str = "index.md";

/// Arguments for the sync command.
#[derive(Args)]
pub(crate) struct SyncArgs {
    /// Path to configuration file (default: auto-discover nmc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory for rendered pages (overrides config).
    #[arg(short, long)]
    pub(crate) output_dir: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl SyncArgs {
    /// Execute the sync command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, rendering or writing fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            output_dir: self.output_dir,
        };
        let config = SyncConfig::load(self.config.as_deref(), Some(&cli_settings))?;
        if let Some(path) = &config.config_path {
            output.info(&format!("Using {}", path.display()));
        }

        let output_dir = config.paths.output_dir.clone();
        let source = Arc::new(NotionClient::from_config(&config.notion));
        let assets = Arc::new(FsAssetWriter::new(
            config.paths.assets_dir.clone(),
            config.paths.assets_link_prefix(),
        ));
        let pages = Arc::new(FsPageWriter::new(output_dir.clone()));

        output.highlight(&format!("Syncing database {}...", config.cms_database_id));
        let renderer = Renderer::new(
            config,
            source,
            assets,
            Arc::clone(&pages) as Arc<dyn PageWriter>,
        );
        let summary = renderer.sync()?;

        let index = pages.write(Path::new(INDEX_FILE), &summary.index_markdown)?;
        info!("Wrote view index to {}", index.display());
        print_summary(&output, &summary, &output_dir, &index);

        Ok(())
    }
}

fn print_summary(output: &Output, summary: &SyncSummary, output_dir: &Path, index: &Path) {
    output.success(&format!(
        "\nSynced {} page(s) to {}",
        summary.pages_written,
        output_dir.display()
    ));
    output.info(&format!("Index: {}", index.display()));
}
