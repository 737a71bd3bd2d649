//! Styled text runs.

use serde::Deserialize;

/// One styled text fragment.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RichText {
    /// Text without styling.
    pub plain_text: String,
    /// Link target, if the run is a link.
    #[serde(default)]
    pub href: Option<String>,
    /// Styling flags.
    #[serde(default)]
    pub annotations: Annotations,
}

/// Styling flags of a [`RichText`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
}

impl RichText {
    /// Unstyled run.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            plain_text: text.into(),
            ..Self::default()
        }
    }

    /// Run with the given annotations.
    #[must_use]
    pub fn styled(text: impl Into<String>, annotations: Annotations) -> Self {
        Self {
            plain_text: text.into(),
            href: None,
            annotations,
        }
    }

    /// Attach a link target.
    #[must_use]
    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }
}
