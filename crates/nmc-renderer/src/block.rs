//! Block to Markdown rendering.

use std::sync::Arc;

use nmc_notion::{Block, BlockContent, FileObject, Icon};
use nmc_storage::AssetWriter;

use crate::deferred::DeferredRenderer;
use crate::degraded::render_unsupported;
use crate::error::RenderError;
use crate::link::LinkBase;
use crate::rich_text::render_rich_text;

/// Renders one block at a time.
///
/// Every block type has a fixed template. Unknown or unsupported types
/// render as an HTML comment and log a warning; only failures of the
/// collaborators (asset download, database rendering) are errors.
pub struct BlockRenderer {
    deferred: Arc<dyn DeferredRenderer>,
}

impl BlockRenderer {
    #[must_use]
    pub fn new(deferred: Arc<dyn DeferredRenderer>) -> Self {
        Self { deferred }
    }

    /// Render `block` as Markdown, storing images through `assets`.
    ///
    /// Links are written relative to the page at `base`.
    ///
    /// # Errors
    ///
    /// Returns an error if an image download fails or an embedded database
    /// cannot be rendered.
    pub fn render_block(
        &self,
        block: &Block,
        assets: &dyn AssetWriter,
        base: &LinkBase,
    ) -> Result<String, RenderError> {
        let markdown = match &block.content {
            BlockContent::Paragraph(p) => render_rich_text(&p.rich_text),
            BlockContent::Heading1(p) => format!("# {}", render_rich_text(&p.rich_text)),
            BlockContent::Heading2(p) => format!("## {}", render_rich_text(&p.rich_text)),
            BlockContent::Heading3(p) => format!("### {}", render_rich_text(&p.rich_text)),
            BlockContent::BulletedListItem(p) => format!("- {}", render_rich_text(&p.rich_text)),
            BlockContent::NumberedListItem(p) => {
                format!("1. {}", render_rich_text(&p.rich_text))
            }
            BlockContent::ToDo(p) => format!("[ ] {}", render_rich_text(&p.rich_text)),
            BlockContent::Quote(p) => format!("> {}", render_rich_text(&p.rich_text)),
            BlockContent::Code(code) => format!(
                "```{}\n{}\n```",
                code.language,
                render_rich_text(&code.rich_text)
            ),
            BlockContent::Callout(callout) => {
                let text = render_rich_text(&callout.rich_text);
                match &callout.icon {
                    Some(icon) => format!("> {} {text}", render_icon(icon)),
                    None => format!("> {text}"),
                }
            }
            BlockContent::Divider => "---".to_owned(),
            BlockContent::ChildDatabase => {
                self.deferred
                    .render_child_database(&block.id, base)?
                    .markdown
            }
            BlockContent::Image(image) => render_image(&block.id, image, assets, base)?,
            BlockContent::Unsupported { kind, payload } => {
                render_unsupported(format!("unsupported block type: {kind}"), payload)
            }
        };
        Ok(markdown)
    }
}

/// Emoji icons render as themselves; other icon types degrade.
fn render_icon(icon: &Icon) -> String {
    match icon {
        Icon::Emoji(emoji) => emoji.clone(),
        other => render_unsupported(format!("unsupported icon type: {}", other.kind()), other),
    }
}

/// Download the image and link it. Captions are not rendered.
fn render_image(
    block_id: &str,
    image: &FileObject,
    assets: &dyn AssetWriter,
    base: &LinkBase,
) -> Result<String, RenderError> {
    let file = assets.download(image.url(), block_id)?;
    Ok(format!("![image-{block_id}]({})", base.link(&file)))
}
