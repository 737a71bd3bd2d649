//! Index of pages+views databases.
//!
//! Each section lists links to pages. Only pages that appear in some
//! section are executed and written.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use nmc_config::DatabaseConfig;
use nmc_storage::PageWriter;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::entry::RenderDatabasePageTask;
use crate::error::RenderError;
use crate::link::LinkBase;

/// Rendered index plus the pages written for it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewsOutput {
    pub markdown: String,
    /// Paths returned by the page writer, in task order.
    pub written: Vec<PathBuf>,
}

struct Section<'a> {
    heading: &'a str,
    tasks: Vec<usize>,
}

/// Renders page listings and writes the listed pages.
pub struct ViewRenderer {
    pages: Arc<dyn PageWriter>,
}

impl ViewRenderer {
    #[must_use]
    pub fn new(pages: Arc<dyn PageWriter>) -> Self {
        Self { pages }
    }

    /// Build the index for `tasks` and execute every listed task.
    ///
    /// Without configured views, pages are grouped by category in order of
    /// first appearance. Links are relative to the page at `base`.
    ///
    /// # Errors
    ///
    /// Returns the first error of any executed task or page write.
    pub fn render_views(
        &self,
        tasks: &[RenderDatabasePageTask],
        config: &DatabaseConfig,
        base: &LinkBase,
    ) -> Result<ViewsOutput, RenderError> {
        let mut sections = if config.views.is_empty() {
            group_by_category(tasks)
        } else {
            config
                .views
                .iter()
                .map(|view| Section {
                    heading: &view.title,
                    tasks: (0..tasks.len())
                        .filter(|&i| {
                            view.category
                                .as_deref()
                                .is_none_or(|c| c == tasks[i].properties().meta.category)
                        })
                        .collect(),
                })
                .collect()
        };
        for section in &mut sections {
            section.tasks.sort_by(|&a, &b| by_order(&tasks[a], &tasks[b]));
        }

        let mut listed = vec![false; tasks.len()];
        for section in &sections {
            for &i in &section.tasks {
                listed[i] = true;
            }
        }
        for (task, _) in tasks.iter().zip(&listed).filter(|(_, l)| !**l) {
            debug!("Skipping page {} not listed in any view", task.path());
        }

        let selected: Vec<&RenderDatabasePageTask> = tasks
            .iter()
            .zip(&listed)
            .filter_map(|(task, &l)| l.then_some(task))
            .collect();
        info!("Rendering {} of {} pages", selected.len(), tasks.len());

        let written = selected
            .par_iter()
            .map(|task| self.write_page(task))
            .collect::<Result<Vec<_>, _>>()?;

        let markdown = sections
            .iter()
            .map(|section| render_section(section, tasks, base))
            .collect::<Vec<_>>()
            .join("\n\n");

        Ok(ViewsOutput { markdown, written })
    }

    fn write_page(&self, task: &RenderDatabasePageTask) -> Result<PathBuf, RenderError> {
        let page = task.execute()?;
        let path = self
            .pages
            .write(Path::new(&page.path), &page.to_markdown()?)?;
        Ok(path)
    }
}

fn group_by_category(tasks: &[RenderDatabasePageTask]) -> Vec<Section<'_>> {
    let mut sections: Vec<Section<'_>> = Vec::new();
    for (i, task) in tasks.iter().enumerate() {
        let category = task.properties().meta.category.as_str();
        match sections.iter_mut().find(|s| s.heading == category) {
            Some(section) => section.tasks.push(i),
            None => sections.push(Section {
                heading: category,
                tasks: vec![i],
            }),
        }
    }
    sections
}

/// Pages with an order come first, ascending.
fn by_order(a: &RenderDatabasePageTask, b: &RenderDatabasePageTask) -> Ordering {
    match (a.properties().meta.order, b.properties().meta.order) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn render_section(
    section: &Section<'_>,
    tasks: &[RenderDatabasePageTask],
    base: &LinkBase,
) -> String {
    let mut lines = vec![format!("## {}", section.heading)];
    lines.extend(section.tasks.iter().map(|&i| {
        let task = &tasks[i];
        format!("- [{}]({})", task.properties().meta.title, base.link(task.path()))
    }));
    lines.join("\n")
}
