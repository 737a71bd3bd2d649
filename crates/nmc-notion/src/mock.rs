//! Mock content source for testing.
//!
//! Provides [`MockContentSource`] for unit testing without network access.

use std::collections::HashMap;
use std::sync::RwLock;

use nmc_config::DatabaseSort;

use crate::error::NotionError;
use crate::source::ContentSource;
use crate::types::{Block, Database, List, Page, QueryResult};

/// Recorded database query.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedQuery {
    pub database_id: String,
    pub sorts: Vec<DatabaseSort>,
    pub page_size: u32,
}

/// In-memory content source.
///
/// # Example
///
/// ```ignore
/// use nmc_notion::{Block, BlockContent, MockContentSource, Page};
///
/// let source = MockContentSource::new()
///     .with_rows("db1", vec![Page::new("p1", "https://notion.so/p1")])
///     .with_blocks("p1", vec![Block::new("b1", BlockContent::Divider)]);
/// ```
#[derive(Debug, Default)]
pub struct MockContentSource {
    rows: RwLock<HashMap<String, Vec<Page>>>,
    cursors: RwLock<HashMap<String, String>>,
    blocks: RwLock<HashMap<String, Vec<Block>>>,
    queries: RwLock<Vec<RecordedQuery>>,
}

impl MockContentSource {
    /// Create a new empty mock source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a database and the rows its query returns.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_rows(self, database_id: impl Into<String>, rows: Vec<Page>) -> Self {
        self.rows.write().unwrap().insert(database_id.into(), rows);
        self
    }

    /// Make the query of `database_id` report more results behind `cursor`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_next_cursor(self, database_id: impl Into<String>, cursor: impl Into<String>) -> Self {
        self.cursors
            .write()
            .unwrap()
            .insert(database_id.into(), cursor.into());
        self
    }

    /// Register the children of a page or block.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_blocks(self, block_id: impl Into<String>, blocks: Vec<Block>) -> Self {
        self.blocks.write().unwrap().insert(block_id.into(), blocks);
        self
    }

    /// Queries issued so far, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn queries(&self) -> Vec<RecordedQuery> {
        self.queries.read().unwrap().clone()
    }

    /// Number of queries issued against `database_id`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn query_count(&self, database_id: &str) -> usize {
        self.queries
            .read()
            .unwrap()
            .iter()
            .filter(|q| q.database_id == database_id)
            .count()
    }
}

fn not_found(id: &str) -> NotionError {
    NotionError::Http {
        status: 404,
        body: format!("Could not find object with ID: {id}"),
    }
}

impl ContentSource for MockContentSource {
    fn retrieve_database(&self, database_id: &str) -> Result<Database, NotionError> {
        if self.rows.read().unwrap().contains_key(database_id) {
            Ok(Database {
                id: database_id.to_owned(),
                title: Vec::new(),
            })
        } else {
            Err(not_found(database_id))
        }
    }

    fn query_database(
        &self,
        database_id: &str,
        sorts: &[DatabaseSort],
        page_size: u32,
    ) -> Result<QueryResult, NotionError> {
        self.queries.write().unwrap().push(RecordedQuery {
            database_id: database_id.to_owned(),
            sorts: sorts.to_vec(),
            page_size,
        });

        let rows = self
            .rows
            .read()
            .unwrap()
            .get(database_id)
            .cloned()
            .ok_or_else(|| not_found(database_id))?;
        let next_cursor = self.cursors.read().unwrap().get(database_id).cloned();

        Ok(List {
            results: rows,
            has_more: next_cursor.is_some(),
            next_cursor,
        })
    }

    fn list_block_children(&self, block_id: &str) -> Result<Vec<Block>, NotionError> {
        Ok(self
            .blocks
            .read()
            .unwrap()
            .get(block_id)
            .cloned()
            .unwrap_or_default())
    }
}
