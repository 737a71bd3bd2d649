//! Notion content model.
//!
//! Notion objects are tagged by a `type` field, with the variant payload stored
//! under a key of the same name:
//!
//! ```json
//! { "id": "...", "type": "paragraph", "paragraph": { "rich_text": [] } }
//! ```
//!
//! Tags this crate does not model decode into an `Unsupported` variant that
//! keeps the raw JSON, so one unrecognized node never fails a whole response.

mod block;
mod page;
mod rich_text;

pub use block::{
    Block, BlockContent, CalloutPayload, CodePayload, FileObject, FileUrl, Icon, TextPayload,
};
pub use page::{
    Database, DateValue, List, Page, PropertyValue, QueryResult, Relation, SelectOption, User,
};
pub use rich_text::{Annotations, RichText};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Decode the payload stored under the `kind` key.
///
/// A missing key decodes from `null`, which succeeds for payloads whose
/// fields all have defaults.
fn take_payload<T: DeserializeOwned>(
    fields: &mut Map<String, Value>,
    kind: &str,
) -> Result<T, serde_json::Error> {
    let value = fields.remove(kind).unwrap_or(Value::Null);
    serde_json::from_value(value)
}

/// Rebuild the full JSON object of an unrecognized variant for diagnostics.
fn raw_payload(kind: &str, mut fields: Map<String, Value>) -> Value {
    fields.insert("type".to_owned(), Value::String(kind.to_owned()));
    Value::Object(fields)
}
