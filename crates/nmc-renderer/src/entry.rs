//! Per-row work of a database render.
//!
//! A table row becomes a [`DatabaseTableEntry`] right away. A page row
//! becomes a [`RenderDatabasePageTask`]: preparing it only validates the
//! row, while [`RenderDatabasePageTask::execute`] walks the row's block
//! tree, which may contain further databases.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use nmc_config::DatabaseConfig;
use nmc_notion::{ContentSource, Page};
use nmc_storage::AssetWriter;
use rayon::prelude::*;
use serde_json::{Map, Value as JsonValue};
use serde_yaml::{Mapping, Value};
use tracing::{debug, warn};

use crate::block::BlockRenderer;
use crate::error::RenderError;
use crate::link::LinkBase;
use crate::properties::{NormalizedValue, PageProperties, parse_page_properties};
use crate::slug::slugify;

/// Row of a table-mode database.
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseTableEntry {
    pub id: String,
    pub url: String,
    pub properties: PageProperties,
}

impl DatabaseTableEntry {
    /// Parse the row's properties.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::MissingProperty`] for rows without title or category.
    pub fn prepare(page: &Page, config: &DatabaseConfig) -> Result<Self, RenderError> {
        Ok(Self {
            id: page.id.clone(),
            url: page.url.clone(),
            properties: parse_page_properties(page, config)?,
        })
    }
}

/// Collaborators a page task needs to render its blocks.
#[derive(Clone)]
pub struct PageRenderContext {
    pub source: Arc<dyn ContentSource>,
    pub blocks: Arc<BlockRenderer>,
    pub assets: Arc<dyn AssetWriter>,
}

/// Prepared render of one database row as its own page.
pub struct RenderDatabasePageTask {
    properties: PageProperties,
    path: String,
    additional_frontmatter: Map<String, JsonValue>,
    context: PageRenderContext,
}

impl RenderDatabasePageTask {
    /// Validate the row and compute its output path. Nothing is fetched.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::MissingProperty`] for rows without title or category.
    pub fn prepare(
        page: &Page,
        config: &DatabaseConfig,
        context: &PageRenderContext,
    ) -> Result<Self, RenderError> {
        let properties = parse_page_properties(page, config)?;
        let path = page_path(&properties);
        Ok(Self {
            properties,
            path,
            additional_frontmatter: config.additional_page_frontmatter.clone(),
            context: context.clone(),
        })
    }

    #[must_use]
    pub fn properties(&self) -> &PageProperties {
        &self.properties
    }

    /// Output path relative to the output directory, `/`-separated.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Fetch the row's blocks and render them.
    ///
    /// Links in the body are relative to the page's own directory.
    ///
    /// # Errors
    ///
    /// Returns the first error of any block, including errors of nested
    /// databases.
    pub fn execute(&self) -> Result<RenderedDatabasePage, RenderError> {
        let meta = &self.properties.meta;
        debug!("Rendering page {} ({})", meta.title, meta.id);

        let blocks = self.context.source.list_block_children(&meta.id)?;
        let assets = self.context.assets.as_ref();
        let base = LinkBase::for_page(&self.path);
        let rendered = blocks
            .par_iter()
            .map(|block| self.context.blocks.render_block(block, assets, &base))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RenderedDatabasePage {
            path: self.path.clone(),
            frontmatter: frontmatter(&self.properties, &self.additional_frontmatter)?,
            body: rendered.join("\n\n"),
        })
    }
}

impl fmt::Debug for RenderDatabasePageTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderDatabasePageTask")
            .field("properties", &self.properties)
            .field("path", &self.path)
            .field("additional_frontmatter", &self.additional_frontmatter)
            .finish_non_exhaustive()
    }
}

/// Give every task a distinct output path.
///
/// The first task keeps a contested path; later ones get the page id
/// appended to the file stem, e.g. `guides/intro-<id>.md`.
pub(crate) fn disambiguate_paths(tasks: &mut [RenderDatabasePageTask]) {
    let mut seen = HashSet::new();
    for task in tasks {
        if seen.insert(task.path.clone()) {
            continue;
        }
        let stem = task.path.strip_suffix(".md").unwrap_or(&task.path);
        let path = format!("{stem}-{}.md", task.properties.meta.id.replace('-', ""));
        warn!(
            page = %task.properties.meta.id,
            "Output path {} is already taken, writing {path}",
            task.path
        );
        seen.insert(path.clone());
        task.path = path;
    }
}

/// Executed page task.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDatabasePage {
    /// Output path relative to the output directory.
    pub path: String,
    pub frontmatter: Mapping,
    pub body: String,
}

impl RenderedDatabasePage {
    /// Page file contents: YAML frontmatter followed by the body.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Frontmatter`] if serialization fails.
    pub fn to_markdown(&self) -> Result<String, RenderError> {
        let yaml = serde_yaml::to_string(&self.frontmatter)?;
        Ok(format!("---\n{yaml}---\n\n{}\n", self.body))
    }

    #[must_use]
    pub fn relative_path(&self) -> &Path {
        Path::new(&self.path)
    }
}

/// `<category>/<title>.md`, both slugified. Titles without any slug-safe
/// character fall back to the page id.
fn page_path(properties: &PageProperties) -> String {
    let meta = &properties.meta;
    let mut file = slugify(&meta.title);
    if file.is_empty() {
        file = meta.id.replace('-', "");
    }
    let category = slugify(&meta.category);
    if category.is_empty() {
        format!("{file}.md")
    } else {
        format!("{category}/{file}.md")
    }
}

fn frontmatter(
    properties: &PageProperties,
    additional: &Map<String, JsonValue>,
) -> Result<Mapping, RenderError> {
    let meta = &properties.meta;
    let mut map = Mapping::new();
    map.insert(key("id"), Value::String(meta.id.clone()));
    map.insert(key("url"), Value::String(meta.url.clone()));
    map.insert(key("title"), Value::String(meta.title.clone()));
    map.insert(key("category"), Value::String(meta.category.clone()));
    if let Some(order) = meta.order {
        map.insert(key("order"), serde_yaml::to_value(NormalizedValue::Number(order))?);
    }
    for (name, value) in additional {
        map.insert(Value::String(name.clone()), serde_yaml::to_value(value)?);
    }

    let mut values = Mapping::new();
    for (slug, value) in properties.ordered_values() {
        values.insert(key(slug), serde_yaml::to_value(value)?);
    }
    map.insert(key("properties"), Value::Mapping(values));

    Ok(map)
}

fn key(name: &str) -> Value {
    Value::String(name.to_owned())
}
