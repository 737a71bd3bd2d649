//! Content source abstraction.

use nmc_config::DatabaseSort;

use crate::client::NotionClient;
use crate::error::NotionError;
use crate::types::{Block, Database, QueryResult};

/// Remote source of pages, databases and blocks.
///
/// Implementations must be shareable across the threads that render
/// database rows in parallel.
pub trait ContentSource: Send + Sync {
    /// Retrieve a database descriptor.
    fn retrieve_database(&self, database_id: &str) -> Result<Database, NotionError>;

    /// Query one page of rows, at most `page_size` long.
    fn query_database(
        &self,
        database_id: &str,
        sorts: &[DatabaseSort],
        page_size: u32,
    ) -> Result<QueryResult, NotionError>;

    /// All direct children of a block or page.
    fn list_block_children(&self, block_id: &str) -> Result<Vec<Block>, NotionError>;
}

impl ContentSource for NotionClient {
    fn retrieve_database(&self, database_id: &str) -> Result<Database, NotionError> {
        self.get_database(database_id)
    }

    fn query_database(
        &self,
        database_id: &str,
        sorts: &[DatabaseSort],
        page_size: u32,
    ) -> Result<QueryResult, NotionError> {
        self.post_database_query(database_id, sorts, page_size)
    }

    fn list_block_children(&self, block_id: &str) -> Result<Vec<Block>, NotionError> {
        self.get_block_children(block_id)
    }
}
