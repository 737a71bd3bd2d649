//! Shared test fixtures.

use std::collections::HashMap;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use nmc_config::{DatabaseConfig, DatabaseSort, SyncConfig};
use nmc_notion::{
    Block, ContentSource, Database, MockContentSource, NotionError, PropertyValue, QueryResult,
    RichText, SelectOption,
};
use nmc_storage::{MockAssetWriter, MockPageWriter};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::registry::Registry;

use crate::block::BlockRenderer;
use crate::database::{ChildDatabaseRenderer, DatabaseEntries, DatabaseRenderResult};
use crate::deferred::DeferredRenderer;
use crate::entry::PageRenderContext;
use crate::error::RenderError;
use crate::link::LinkBase;

pub(crate) fn title(text: &str) -> PropertyValue {
    PropertyValue::Title(vec![RichText::plain(text)])
}

pub(crate) fn rich_text(text: &str) -> PropertyValue {
    PropertyValue::RichText(vec![RichText::plain(text)])
}

pub(crate) fn select(name: &str) -> PropertyValue {
    PropertyValue::Select(Some(SelectOption::named(name)))
}

pub(crate) fn number(n: f64) -> PropertyValue {
    PropertyValue::Number(Some(n))
}

/// Parse a sync configuration, filling in the Notion section.
pub(crate) fn sync_config(toml: &str) -> SyncConfig {
    let content = format!("{toml}\n[notion]\napi_token = \"secret\"\n");
    SyncConfig::from_toml(&content, Path::new("/site")).unwrap()
}

/// Resolve `.` and `..` components without touching the filesystem.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

/// Database renderer over empty mock collaborators.
pub(crate) fn child_database_renderer() -> ChildDatabaseRenderer {
    let context = PageRenderContext {
        source: Arc::new(MockContentSource::new()),
        blocks: Arc::new(BlockRenderer::new(Arc::new(StaticDeferredRenderer::new("")))),
        assets: Arc::new(MockAssetWriter::new("assets")),
    };
    ChildDatabaseRenderer::new(
        Arc::new(sync_config("cms_database_id = \"cms\"")),
        context,
        Arc::new(MockPageWriter::new()),
    )
}

/// Deferred renderer returning fixed Markdown for every database.
pub(crate) struct StaticDeferredRenderer {
    markdown: String,
}

impl StaticDeferredRenderer {
    pub(crate) fn new(markdown: &str) -> Self {
        Self {
            markdown: markdown.to_owned(),
        }
    }
}

impl DeferredRenderer for StaticDeferredRenderer {
    fn render_child_database(
        &self,
        _database_id: &str,
        _base: &LinkBase,
    ) -> Result<DatabaseRenderResult, RenderError> {
        Ok(DatabaseRenderResult {
            config: DatabaseConfig::new("Category"),
            entries: DatabaseEntries::Table(Vec::new()),
            markdown: self.markdown.clone(),
            written: Vec::new(),
        })
    }
}

/// Content source that answers block listings after a per-block delay.
///
/// Lets tests make early rows finish after later ones.
pub(crate) struct DelayedContentSource {
    inner: MockContentSource,
    delays: HashMap<String, Duration>,
}

impl DelayedContentSource {
    pub(crate) fn new(inner: MockContentSource) -> Self {
        Self {
            inner,
            delays: HashMap::new(),
        }
    }

    pub(crate) fn with_delay(mut self, block_id: &str, delay: Duration) -> Self {
        self.delays.insert(block_id.to_owned(), delay);
        self
    }
}

impl ContentSource for DelayedContentSource {
    fn retrieve_database(&self, database_id: &str) -> Result<Database, NotionError> {
        self.inner.retrieve_database(database_id)
    }

    fn query_database(
        &self,
        database_id: &str,
        sorts: &[DatabaseSort],
        page_size: u32,
    ) -> Result<QueryResult, NotionError> {
        self.inner.query_database(database_id, sorts, page_size)
    }

    fn list_block_children(&self, block_id: &str) -> Result<Vec<Block>, NotionError> {
        if let Some(delay) = self.delays.get(block_id) {
            thread::sleep(*delay);
        }
        self.inner.list_block_children(block_id)
    }
}

/// A WARN event seen by [`capture_warnings`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CapturedWarning {
    pub(crate) message: String,
    /// Debug form of the `payload` field, if the event carried one.
    pub(crate) payload: Option<String>,
}

/// Run `f` on the current thread and collect its WARN events.
pub(crate) fn capture_warnings<R>(f: impl FnOnce() -> R) -> (R, Vec<CapturedWarning>) {
    let collector = WarningCollector::default();
    let subscriber = Registry::default().with(collector.clone());
    let result = tracing::subscriber::with_default(subscriber, f);
    let warnings = collector.0.lock().unwrap().clone();
    (result, warnings)
}

#[derive(Clone, Default)]
struct WarningCollector(Arc<Mutex<Vec<CapturedWarning>>>);

impl<S: Subscriber> Layer<S> for WarningCollector {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() != Level::WARN {
            return;
        }
        let mut visitor = WarningVisitor::default();
        event.record(&mut visitor);
        if let Some(message) = visitor.message {
            self.0.lock().unwrap().push(CapturedWarning {
                message,
                payload: visitor.payload,
            });
        }
    }
}

#[derive(Default)]
struct WarningVisitor {
    message: Option<String>,
    payload: Option<String>,
}

impl Visit for WarningVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = Some(value.to_owned()),
            "payload" => self.payload = Some(value.to_owned()),
            _ => {}
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => self.message = Some(format!("{value:?}")),
            "payload" => self.payload = Some(format!("{value:?}")),
            _ => {}
        }
    }
}
