//! Notion integration for NMC.
//!
//! This crate provides:
//! - the Notion content model ([`Block`], [`Page`], [`PropertyValue`], [`RichText`], [`Icon`])
//! - [`ContentSource`]: the remote retrieval interface consumed by the renderer
//! - [`NotionClient`]: REST API client implementing [`ContentSource`]
//! - [`MockContentSource`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use nmc_config::SyncConfig;
//! use nmc_notion::{ContentSource, NotionClient};
//!
//! let config = SyncConfig::load(None, None)?;
//! let client = NotionClient::from_config(&config.notion);
//! let rows = client.query_database(&config.cms_database_id, &[], 100)?;
//! println!("{} rows", rows.results.len());
//! ```

mod client;
pub mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod source;
mod types;

pub use client::NotionClient;
pub use error::NotionError;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockContentSource, RecordedQuery};
pub use source::ContentSource;
pub use types::{
    Annotations, Block, BlockContent, CalloutPayload, CodePayload, Database, DateValue,
    FileObject, FileUrl, Icon, List, Page, PropertyValue, QueryResult, Relation, RichText,
    SelectOption, TextPayload, User,
};
