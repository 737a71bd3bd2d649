//! Indirection between block rendering and database rendering.
//!
//! Blocks embed database references and database rows are themselves block
//! trees. [`BlockRenderer`](crate::BlockRenderer) depends only on the
//! [`DeferredRenderer`] trait; the concrete [`ChildDatabaseRenderer`] is
//! linked in when the renderer graph is composed.

use std::sync::{Arc, OnceLock, Weak};

use crate::database::{ChildDatabaseRenderer, DatabaseRenderResult};
use crate::error::RenderError;
use crate::link::LinkBase;

/// Renders database references on behalf of the block renderer.
pub trait DeferredRenderer: Send + Sync {
    /// Fetch and render the database `database_id` for the page at `base`.
    ///
    /// Nothing is cached: a database referenced twice is fetched twice.
    fn render_child_database(
        &self,
        database_id: &str,
        base: &LinkBase,
    ) -> Result<DatabaseRenderResult, RenderError>;
}

/// [`DeferredRenderer`] forwarding to a [`ChildDatabaseRenderer`] linked
/// after construction.
///
/// Holds a weak handle so the renderer graph has no reference cycle.
#[derive(Default)]
pub struct LinkedDeferredRenderer {
    target: OnceLock<Weak<ChildDatabaseRenderer>>,
}

impl LinkedDeferredRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Link the database renderer. Later calls are ignored.
    pub fn link(&self, target: &Arc<ChildDatabaseRenderer>) {
        let _ = self.target.set(Arc::downgrade(target));
    }
}

impl DeferredRenderer for LinkedDeferredRenderer {
    fn render_child_database(
        &self,
        database_id: &str,
        base: &LinkBase,
    ) -> Result<DatabaseRenderResult, RenderError> {
        let target = self
            .target
            .get()
            .and_then(Weak::upgrade)
            .ok_or(RenderError::RendererUnavailable)?;
        target.render_child_database(database_id, base)
    }
}
