//! Error types for rendering.

use nmc_config::ConfigError;
use nmc_notion::NotionError;
use nmc_storage::StorageError;

/// Fatal rendering error.
///
/// Unsupported content never produces an error; it is rendered as a
/// placeholder instead.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// A page lacks its title or its configured category.
    #[error("Page {url} is missing required property {property}")]
    MissingProperty {
        /// Page URL.
        url: String,
        /// Expected property, e.g. `of type 'title'` or `Category`.
        property: String,
    },

    /// The database query reported more rows than one result page holds.
    #[error("Paging not implemented, db {database_id} has more than 100 entries")]
    PaginationUnsupported {
        /// Database id as reported by the content source.
        database_id: String,
    },

    /// Database configuration missing or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Content source request failed.
    #[error("Notion request failed: {0}")]
    Notion(#[from] NotionError),

    /// Asset or page could not be stored.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Page frontmatter could not be serialized.
    #[error("Failed to serialize frontmatter: {0}")]
    Frontmatter(#[from] serde_yaml::Error),

    /// A database reference was rendered after the renderer graph was dropped.
    #[error("Database renderer is not available")]
    RendererUnavailable,
}

impl RenderError {
    /// Missing title property of `url`.
    pub(crate) fn missing_title(url: &str) -> Self {
        Self::MissingProperty {
            url: url.to_owned(),
            property: "of type 'title'".to_owned(),
        }
    }
}
