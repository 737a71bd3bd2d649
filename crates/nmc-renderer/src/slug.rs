//! Key-safe names for properties and output paths.

/// Lowercase ASCII slug: alphanumerics kept, whitespace, `-` and `_` become
/// single hyphens, everything else dropped.
///
/// ```
/// use nmc_renderer::slugify;
///
/// assert_eq!(slugify("Release Date"), "release-date");
/// assert_eq!(slugify("Q&A: Part 2"), "qa-part-2");
/// ```
#[must_use]
pub fn slugify(text: &str) -> String {
    text.chars()
        .filter_map(|c| {
            if c.is_ascii_alphanumeric() {
                Some(c.to_ascii_lowercase())
            } else if c.is_whitespace() || c == '-' || c == '_' {
                Some('-')
            } else {
                None
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
