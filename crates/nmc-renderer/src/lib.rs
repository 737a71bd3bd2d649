//! Notion to Markdown rendering engine.
//!
//! Turns the block tree of Notion pages into Markdown. Blocks may embed
//! databases, whose rows are rendered either as an inline table or as
//! pages of their own, listed in an index of views.
//!
//! # Architecture
//!
//! - [`BlockRenderer`]: one template per block type, degraded output for
//!   everything else
//! - [`DeferredRenderer`]: the seam through which blocks render databases
//! - [`ChildDatabaseRenderer`]: fetches rows and picks table or page mode
//! - [`RenderDatabasePageTask`]: a row prepared now and rendered later
//! - [`render_table`] / [`ViewRenderer`]: assemble a database's Markdown
//!
//! [`Renderer`] wires these together.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use nmc_config::SyncConfig;
//! use nmc_notion::NotionClient;
//! use nmc_renderer::Renderer;
//! use nmc_storage::{FsAssetWriter, FsPageWriter};
//!
//! let config = SyncConfig::load(None, None)?;
//! let source = Arc::new(NotionClient::from_config(&config.notion));
//! let assets = Arc::new(FsAssetWriter::new(
//!     config.paths.assets_dir.clone(),
//!     config.paths.assets_link_prefix(),
//! ));
//! let pages = Arc::new(FsPageWriter::new(config.paths.output_dir.clone()));
//!
//! let summary = Renderer::new(config, source, assets, pages).sync()?;
//! println!("{} pages", summary.pages_written);
//! ```

mod block;
mod database;
mod deferred;
mod degraded;
mod entry;
mod error;
mod link;
mod properties;
mod rich_text;
mod slug;
mod table;
#[cfg(test)]
mod testing;
mod views;

use std::sync::Arc;

use nmc_config::SyncConfig;
use nmc_notion::ContentSource;
use nmc_storage::{AssetWriter, PageWriter};
use tracing::info;

pub use block::BlockRenderer;
pub use database::{ChildDatabaseRenderer, DatabaseEntries, DatabaseRenderResult, PAGE_SIZE};
pub use deferred::{DeferredRenderer, LinkedDeferredRenderer};
pub use entry::{
    DatabaseTableEntry, PageRenderContext, RenderDatabasePageTask, RenderedDatabasePage,
};
pub use error::RenderError;
pub use link::LinkBase;
pub use properties::{
    NormalizedValue, PageMeta, PageProperties, ParsedProperties, parse_page_properties,
    parse_properties,
};
pub use rich_text::render_rich_text;
pub use slug::slugify;
pub use table::render_table;
pub use views::{ViewRenderer, ViewsOutput};

/// Outcome of a sync.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncSummary {
    /// Number of pages written for the CMS database.
    pub pages_written: usize,
    /// View index of the CMS database.
    pub index_markdown: String,
}

/// Composed renderer graph.
pub struct Renderer {
    config: Arc<SyncConfig>,
    databases: Arc<ChildDatabaseRenderer>,
}

impl Renderer {
    /// Wire the renderer components around the given collaborators.
    #[must_use]
    pub fn new(
        config: SyncConfig,
        source: Arc<dyn ContentSource>,
        assets: Arc<dyn AssetWriter>,
        pages: Arc<dyn PageWriter>,
    ) -> Self {
        let config = Arc::new(config);
        let deferred = Arc::new(LinkedDeferredRenderer::new());
        let blocks = Arc::new(BlockRenderer::new(
            Arc::clone(&deferred) as Arc<dyn DeferredRenderer>
        ));
        let context = PageRenderContext {
            source,
            blocks,
            assets,
        };
        let databases = Arc::new(ChildDatabaseRenderer::new(
            Arc::clone(&config),
            context,
            pages,
        ));
        deferred.link(&databases);

        Self { config, databases }
    }

    /// Render one database reference as seen from the output root.
    ///
    /// # Errors
    ///
    /// See [`ChildDatabaseRenderer::render_child_database`].
    pub fn render_database(&self, database_id: &str) -> Result<DatabaseRenderResult, RenderError> {
        self.databases
            .render_child_database(database_id, &LinkBase::root())
    }

    /// Render the CMS database: every listed row is written as a page and
    /// the view index is returned.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error; pages written before it stay written.
    pub fn sync(&self) -> Result<SyncSummary, RenderError> {
        let cms_database_id = &self.config.cms_database_id;
        info!("Syncing CMS database {cms_database_id}");

        let result = self.render_database(cms_database_id)?;
        info!("Wrote {} pages", result.written.len());

        Ok(SyncSummary {
            pages_written: result.written.len(),
            index_markdown: result.markdown,
        })
    }
}
