//! Block operations for Notion API.

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use tracing::{debug, info};

use super::NotionClient;
use crate::error::NotionError;
use crate::types::{Block, List};

/// Maximum page size accepted by the block children endpoint.
const BLOCK_PAGE_SIZE: u32 = 100;

impl NotionClient {
    /// List all children of a block, following pagination cursors.
    pub(crate) fn get_block_children(&self, block_id: &str) -> Result<Vec<Block>, NotionError> {
        info!("Getting children of block {}", block_id);

        let mut blocks = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut url = format!(
                "{}/blocks/{}/children?page_size={}",
                self.base_url, block_id, BLOCK_PAGE_SIZE
            );
            if let Some(c) = &cursor {
                url.push_str("&start_cursor=");
                url.push_str(&utf8_percent_encode(c, NON_ALPHANUMERIC).to_string());
            }

            let page: List<Block> = self.get_json(&url)?;
            debug!(
                "Block {} page returned {} children",
                block_id,
                page.results.len()
            );
            blocks.extend(page.results);

            match page.next_cursor {
                Some(next) if page.has_more => cursor = Some(next),
                _ => break,
            }
        }

        Ok(blocks)
    }
}
