//! Rendering of database references.

use std::path::PathBuf;
use std::sync::Arc;

use nmc_config::{DatabaseConfig, RenderAs, SyncConfig, lookup_database_config};
use nmc_notion::Page;
use nmc_storage::PageWriter;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::entry::{
    DatabaseTableEntry, PageRenderContext, RenderDatabasePageTask, disambiguate_paths,
};
use crate::error::RenderError;
use crate::link::LinkBase;
use crate::table::render_table;
use crate::views::ViewRenderer;

/// Rows fetched per database query. Larger databases are rejected.
pub const PAGE_SIZE: u32 = 100;

/// Rendered rows of a database, by render mode.
#[derive(Debug)]
pub enum DatabaseEntries {
    Table(Vec<DatabaseTableEntry>),
    Pages(Vec<RenderDatabasePageTask>),
}

impl DatabaseEntries {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Table(entries) => entries.len(),
            Self::Pages(tasks) => tasks.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of rendering one database reference.
#[derive(Debug)]
pub struct DatabaseRenderResult {
    /// Configuration the database was rendered with.
    pub config: DatabaseConfig,
    /// Rows in query order.
    pub entries: DatabaseEntries,
    /// Table or view index Markdown.
    pub markdown: String,
    /// Pages written while rendering (pages+views only).
    pub written: Vec<PathBuf>,
}

/// Fetches a database and renders it as a table or as pages with views.
pub struct ChildDatabaseRenderer {
    config: Arc<SyncConfig>,
    context: PageRenderContext,
    views: ViewRenderer,
}

impl ChildDatabaseRenderer {
    #[must_use]
    pub fn new(
        config: Arc<SyncConfig>,
        context: PageRenderContext,
        pages: Arc<dyn PageWriter>,
    ) -> Self {
        Self {
            config,
            context,
            views: ViewRenderer::new(pages),
        }
    }

    /// Render the database `database_id` for the page at `base`.
    ///
    /// The CMS database and databases configured as `pages+views` render
    /// each row as its own page; all others render as a table.
    ///
    /// # Errors
    ///
    /// Fails when the database has no configuration, has more rows than
    /// [`PAGE_SIZE`], a row lacks required properties, or any fetch or
    /// write fails. No partial output is returned.
    pub fn render_child_database(
        &self,
        database_id: &str,
        base: &LinkBase,
    ) -> Result<DatabaseRenderResult, RenderError> {
        let db_config = lookup_database_config(&self.config, database_id)?;
        let rows = self.fetch_rows(database_id, db_config)?;

        let render_pages = self.config.is_cms_database(database_id)
            || db_config.render_as == RenderAs::PagesAndViews;

        if render_pages {
            debug!("Rendering database {database_id} as pages");
            let mut tasks = self.queue_page_rendering(&rows, db_config)?;
            disambiguate_paths(&mut tasks);
            let output = self.views.render_views(&tasks, db_config, base)?;
            return Ok(DatabaseRenderResult {
                config: db_config.clone(),
                entries: DatabaseEntries::Pages(tasks),
                markdown: output.markdown,
                written: output.written,
            });
        }

        debug!("Rendering database {database_id} as table");
        let entries = rows
            .par_iter()
            .map(|row| DatabaseTableEntry::prepare(row, db_config))
            .collect::<Result<Vec<_>, _>>()?;
        let markdown = render_table(&entries);

        Ok(DatabaseRenderResult {
            config: db_config.clone(),
            entries: DatabaseEntries::Table(entries),
            markdown,
            written: Vec::new(),
        })
    }

    fn queue_page_rendering(
        &self,
        rows: &[Page],
        db_config: &DatabaseConfig,
    ) -> Result<Vec<RenderDatabasePageTask>, RenderError> {
        rows.par_iter()
            .map(|row| RenderDatabasePageTask::prepare(row, db_config, &self.context))
            .collect()
    }

    fn fetch_rows(
        &self,
        database_id: &str,
        db_config: &DatabaseConfig,
    ) -> Result<Vec<Page>, RenderError> {
        let source = &self.context.source;
        let database = source.retrieve_database(database_id)?;
        let result = source.query_database(&database.id, &db_config.sorts, PAGE_SIZE)?;

        if result.has_more() {
            return Err(RenderError::PaginationUnsupported {
                database_id: database.id,
            });
        }

        info!("Fetched {} rows from database {}", result.results.len(), database.id);
        Ok(result.results)
    }
}
