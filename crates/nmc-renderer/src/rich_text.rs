//! Inline Markdown for styled text runs.

use nmc_notion::RichText;

/// Render a sequence of runs as one inline Markdown string.
///
/// Annotations apply innermost-first: code, bold, italic, strikethrough.
/// Links wrap the styled text. Underline has no Markdown form and is dropped.
#[must_use]
pub fn render_rich_text(runs: &[RichText]) -> String {
    runs.iter().map(render_run).collect()
}

fn render_run(run: &RichText) -> String {
    let mut text = run.plain_text.clone();
    if text.is_empty() {
        return text;
    }

    let annotations = &run.annotations;
    if annotations.code {
        text = format!("`{text}`");
    }
    if annotations.bold {
        text = format!("**{text}**");
    }
    if annotations.italic {
        text = format!("*{text}*");
    }
    if annotations.strikethrough {
        text = format!("~~{text}~~");
    }

    match &run.href {
        Some(href) => format!("[{text}]({href})"),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nmc_notion::Annotations;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_runs_concatenate() {
        let runs = [RichText::plain("Hello, "), RichText::plain("world")];
        assert_eq!(render_rich_text(&runs), "Hello, world");
    }

    #[test]
    fn test_annotations_nest_innermost_code() {
        let run = RichText::styled(
            "x",
            Annotations {
                bold: true,
                italic: true,
                strikethrough: true,
                code: true,
                ..Annotations::default()
            },
        );
        assert_eq!(render_rich_text(&[run]), "~~***`x`***~~");
    }

    #[test]
    fn test_link_wraps_styled_text() {
        let run = RichText::styled(
            "docs",
            Annotations {
                bold: true,
                ..Annotations::default()
            },
        )
        .with_href("https://example.com");
        assert_eq!(render_rich_text(&[run]), "[**docs**](https://example.com)");
    }

    #[test]
    fn test_underline_ignored() {
        let run = RichText::styled(
            "u",
            Annotations {
                underline: true,
                ..Annotations::default()
            },
        );
        assert_eq!(render_rich_text(&[run]), "u");
    }

    #[test]
    fn test_empty_run_has_no_markers() {
        let run = RichText::styled(
            "",
            Annotations {
                bold: true,
                ..Annotations::default()
            },
        );
        assert_eq!(render_rich_text(&[run]), "");
    }
}
