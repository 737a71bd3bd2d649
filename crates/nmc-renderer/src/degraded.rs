//! Placeholder output for content the renderer does not support.

use std::fmt::Debug;

use tracing::warn;

/// Log `message` with the offending payload and return it unchanged.
pub(crate) fn report_unsupported(message: String, payload: &impl Debug) -> String {
    warn!(payload = ?payload, "{message}");
    message
}

/// Log `message` and return it as an HTML comment.
pub(crate) fn render_unsupported(message: String, payload: &impl Debug) -> String {
    format!("<!-- {} -->", report_unsupported(message, payload))
}
