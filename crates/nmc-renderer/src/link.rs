//! Relative links between files of the output directory.

/// Prefix that turns an output-relative path into a link from one page.
///
/// Pages at the output root link with `./`; a page `n` directories deep
/// links with `../` repeated `n` times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkBase(String);

impl LinkBase {
    /// Base of a page at the output root, such as `index.md`.
    #[must_use]
    pub fn root() -> Self {
        Self("./".to_owned())
    }

    /// Base of the page written at the output-relative `page_path`.
    ///
    /// ```
    /// use nmc_renderer::LinkBase;
    ///
    /// assert_eq!(LinkBase::for_page("index.md").link("assets/a.png"), "./assets/a.png");
    /// assert_eq!(LinkBase::for_page("guides/intro.md").link("assets/a.png"), "../assets/a.png");
    /// ```
    #[must_use]
    pub fn for_page(page_path: &str) -> Self {
        let depth = page_path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .count()
            .saturating_sub(1);
        if depth == 0 {
            Self::root()
        } else {
            Self("../".repeat(depth))
        }
    }

    /// Link to the output-relative `target`.
    #[must_use]
    pub fn link(&self, target: &str) -> String {
        format!("{}{}", self.0, target.trim_start_matches("./"))
    }
}

impl Default for LinkBase {
    fn default() -> Self {
        Self::root()
    }
}
