//! Content blocks.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::{RichText, raw_payload, take_payload};

/// One node of a page's content tree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawBlock")]
pub struct Block {
    /// Block id, used for addressing (e.g. asset names).
    pub id: String,
    /// Whether the block has nested children.
    pub has_children: bool,
    /// Variant payload.
    pub content: BlockContent,
}

/// Block variants.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockContent {
    Paragraph(TextPayload),
    Heading1(TextPayload),
    Heading2(TextPayload),
    Heading3(TextPayload),
    BulletedListItem(TextPayload),
    NumberedListItem(TextPayload),
    ToDo(TextPayload),
    Quote(TextPayload),
    Code(CodePayload),
    Callout(CalloutPayload),
    Image(FileObject),
    Divider,
    /// Reference to a nested database; the block id is the database id.
    ChildDatabase,
    /// Any other block type, including ones Notion itself reports as unsupported.
    Unsupported {
        /// The `type` tag.
        kind: String,
        /// The raw block object.
        payload: Value,
    },
}

/// Payload of text-carrying blocks.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TextPayload {
    /// Text runs. Older API versions call this `text`.
    #[serde(default, alias = "text")]
    pub rich_text: Vec<RichText>,
}

/// Payload of `code` blocks.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CodePayload {
    #[serde(default, alias = "text")]
    pub rich_text: Vec<RichText>,
    /// Language tag for the opening fence.
    #[serde(default)]
    pub language: String,
}

/// Payload of `callout` blocks.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CalloutPayload {
    #[serde(default, alias = "text")]
    pub rich_text: Vec<RichText>,
    #[serde(default)]
    pub icon: Option<Icon>,
}

/// File reference of an image block.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FileObject {
    /// File hosted by Notion (signed, expiring URL).
    File { file: FileUrl },
    /// File hosted elsewhere.
    External { external: FileUrl },
}

impl FileObject {
    /// Effective download URL.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::File { file } => &file.url,
            Self::External { external } => &external.url,
        }
    }
}

/// URL wrapper used by file objects.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FileUrl {
    pub url: String,
}

/// Page or callout icon.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawTagged")]
pub enum Icon {
    Emoji(String),
    File(FileUrl),
    External(FileUrl),
    /// Icon types this crate does not model (e.g. `custom_emoji`).
    Unsupported { kind: String, payload: Value },
}

impl Icon {
    /// The `type` tag of this icon.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::Emoji(_) => "emoji",
            Self::File(_) => "file",
            Self::External(_) => "external",
            Self::Unsupported { kind, .. } => kind,
        }
    }
}

impl Block {
    /// Create a block with the given content.
    #[must_use]
    pub fn new(id: impl Into<String>, content: BlockContent) -> Self {
        Self {
            id: id.into(),
            has_children: false,
            content,
        }
    }
}

impl BlockContent {
    /// The `type` tag of this block.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::Paragraph(_) => "paragraph",
            Self::Heading1(_) => "heading_1",
            Self::Heading2(_) => "heading_2",
            Self::Heading3(_) => "heading_3",
            Self::BulletedListItem(_) => "bulleted_list_item",
            Self::NumberedListItem(_) => "numbered_list_item",
            Self::ToDo(_) => "to_do",
            Self::Quote(_) => "quote",
            Self::Code(_) => "code",
            Self::Callout(_) => "callout",
            Self::Image(_) => "image",
            Self::Divider => "divider",
            Self::ChildDatabase => "child_database",
            Self::Unsupported { kind, .. } => kind,
        }
    }
}

/// Wire shape of a block before variant dispatch.
#[derive(Deserialize)]
struct RawBlock {
    id: String,
    #[serde(default)]
    has_children: bool,
    #[serde(rename = "type")]
    kind: String,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl TryFrom<RawBlock> for Block {
    type Error = serde_json::Error;

    fn try_from(raw: RawBlock) -> Result<Self, Self::Error> {
        let RawBlock {
            id,
            has_children,
            kind,
            mut fields,
        } = raw;

        let content = match kind.as_str() {
            "paragraph" => BlockContent::Paragraph(take_payload(&mut fields, &kind)?),
            "heading_1" => BlockContent::Heading1(take_payload(&mut fields, &kind)?),
            "heading_2" => BlockContent::Heading2(take_payload(&mut fields, &kind)?),
            "heading_3" => BlockContent::Heading3(take_payload(&mut fields, &kind)?),
            "bulleted_list_item" => {
                BlockContent::BulletedListItem(take_payload(&mut fields, &kind)?)
            }
            "numbered_list_item" => {
                BlockContent::NumberedListItem(take_payload(&mut fields, &kind)?)
            }
            "to_do" => BlockContent::ToDo(take_payload(&mut fields, &kind)?),
            "quote" => BlockContent::Quote(take_payload(&mut fields, &kind)?),
            "code" => BlockContent::Code(take_payload(&mut fields, &kind)?),
            "callout" => BlockContent::Callout(take_payload(&mut fields, &kind)?),
            "image" => BlockContent::Image(take_payload(&mut fields, &kind)?),
            "divider" => BlockContent::Divider,
            "child_database" => BlockContent::ChildDatabase,
            _ => {
                fields.insert("id".to_owned(), Value::String(id.clone()));
                BlockContent::Unsupported {
                    payload: raw_payload(&kind, fields),
                    kind,
                }
            }
        };

        Ok(Self {
            id,
            has_children,
            content,
        })
    }
}

/// Wire shape of a tagged object without an id.
#[derive(Deserialize)]
struct RawTagged {
    #[serde(rename = "type")]
    kind: String,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl TryFrom<RawTagged> for Icon {
    type Error = serde_json::Error;

    fn try_from(raw: RawTagged) -> Result<Self, Self::Error> {
        let RawTagged { kind, mut fields } = raw;
        Ok(match kind.as_str() {
            "emoji" => Self::Emoji(take_payload(&mut fields, &kind)?),
            "file" => Self::File(take_payload(&mut fields, &kind)?),
            "external" => Self::External(take_payload(&mut fields, &kind)?),
            _ => Self::Unsupported {
                payload: raw_payload(&kind, fields),
                kind,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn block(value: Value) -> Block {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_decode_paragraph() {
        let b = block(json!({
            "object": "block",
            "id": "b1",
            "type": "paragraph",
            "has_children": false,
            "paragraph": { "rich_text": [{ "plain_text": "Hello" }], "color": "default" }
        }));
        assert_eq!(b.id, "b1");
        assert_eq!(
            b.content,
            BlockContent::Paragraph(TextPayload {
                rich_text: vec![RichText::plain("Hello")]
            })
        );
    }

    #[test]
    fn test_decode_legacy_text_key() {
        let b = block(json!({
            "id": "b2",
            "type": "heading_2",
            "heading_2": { "text": [{ "plain_text": "Title" }] }
        }));
        assert_eq!(b.content.kind(), "heading_2");
        let BlockContent::Heading2(payload) = b.content else {
            panic!("expected heading_2");
        };
        assert_eq!(payload.rich_text[0].plain_text, "Title");
    }

    #[test]
    fn test_decode_code_and_callout() {
        let code = block(json!({
            "id": "c1",
            "type": "code",
            "code": { "rich_text": [{ "plain_text": "fn main() {}" }], "language": "rust" }
        }));
        let BlockContent::Code(payload) = code.content else {
            panic!("expected code");
        };
        assert_eq!(payload.language, "rust");

        let callout = block(json!({
            "id": "c2",
            "type": "callout",
            "callout": { "rich_text": [], "icon": { "type": "emoji", "emoji": "📌" } }
        }));
        let BlockContent::Callout(payload) = callout.content else {
            panic!("expected callout");
        };
        assert_eq!(payload.icon, Some(Icon::Emoji("📌".to_owned())));
    }

    #[test]
    fn test_decode_image_sources() {
        let external = block(json!({
            "id": "abc",
            "type": "image",
            "image": { "type": "external", "external": { "url": "https://x/y.png" }, "caption": [] }
        }));
        let BlockContent::Image(file) = external.content else {
            panic!("expected image");
        };
        assert_eq!(file.url(), "https://x/y.png");

        let hosted = block(json!({
            "id": "def",
            "type": "image",
            "image": { "type": "file", "file": { "url": "https://s3/z.jpg", "expiry_time": "2024-01-01T00:00:00.000Z" } }
        }));
        let BlockContent::Image(file) = hosted.content else {
            panic!("expected image");
        };
        assert_eq!(file.url(), "https://s3/z.jpg");
    }

    #[test]
    fn test_decode_divider_and_child_database() {
        assert_eq!(
            block(json!({ "id": "d", "type": "divider", "divider": {} })).content,
            BlockContent::Divider
        );
        assert_eq!(
            block(json!({ "id": "db", "type": "child_database", "child_database": { "title": "Tasks" } }))
                .content,
            BlockContent::ChildDatabase
        );
    }

    #[test]
    fn test_unknown_block_keeps_payload() {
        let b = block(json!({
            "id": "t1",
            "type": "toggle",
            "toggle": { "rich_text": [] }
        }));
        let BlockContent::Unsupported { kind, payload } = &b.content else {
            panic!("expected unsupported");
        };
        assert_eq!(kind, "toggle");
        assert_eq!(payload["type"], "toggle");
        assert_eq!(payload["id"], "t1");
        assert!(payload.get("toggle").is_some());
    }

    #[test]
    fn test_unknown_icon_type() {
        let icon: Icon = serde_json::from_value(json!({
            "type": "custom_emoji",
            "custom_emoji": { "id": "e1", "name": "party" }
        }))
        .unwrap();
        assert_eq!(icon.kind(), "custom_emoji");
        assert!(matches!(icon, Icon::Unsupported { .. }));
    }
}
