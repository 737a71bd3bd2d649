//! Database operations for Notion API.

use nmc_config::DatabaseSort;
use serde_json::json;
use tracing::info;

use super::NotionClient;
use crate::error::NotionError;
use crate::types::{Database, QueryResult};

impl NotionClient {
    /// Retrieve a database descriptor.
    pub(crate) fn get_database(&self, database_id: &str) -> Result<Database, NotionError> {
        let url = format!("{}/databases/{}", self.base_url, database_id);

        info!("Getting database {}", database_id);

        self.get_json(&url)
    }

    /// Query one page of database rows.
    pub(crate) fn post_database_query(
        &self,
        database_id: &str,
        sorts: &[DatabaseSort],
        page_size: u32,
    ) -> Result<QueryResult, NotionError> {
        let url = format!("{}/databases/{}/query", self.base_url, database_id);

        let mut payload = json!({ "page_size": page_size });
        if !sorts.is_empty() {
            payload["sorts"] = serde_json::to_value(sorts)?;
        }

        info!(
            "Querying database {} (page_size={}, sorts={})",
            database_id,
            page_size,
            sorts.len()
        );

        let result: QueryResult = self.post_json(&url, &payload)?;
        info!(
            "Database {} returned {} rows",
            database_id,
            result.results.len()
        );
        Ok(result)
    }
}
