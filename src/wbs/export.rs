//! Projection of a finished tree into kanban task records.

use chrono::{DateTime, Utc};

use crate::error::{Result, WbsError};
use crate::models::{NewTask, TaskStatus, WbsNode, MAX_LEVEL};

/// Tag prepended to every exported description.
const WBS_TAG: &str = "[WBS]";

/// Separator between ancestor titles in a category breadcrumb.
pub const CATEGORY_SEPARATOR: &str = " > ";

/// Tracks the title of the most recent node seen at each ancestor level.
#[derive(Debug, Default)]
struct Breadcrumb {
    titles: [String; MAX_LEVEL as usize],
}

impl Breadcrumb {
    /// Enter a node: it becomes the current title at its level and every
    /// deeper slot is cleared.
    fn visit(&mut self, level: u8, title: &str) {
        let level = usize::from(level);
        if let Some(slot) = self.titles.get_mut(level) {
            *slot = title.to_string();
        }
        for slot in self.titles.iter_mut().skip(level + 1) {
            slot.clear();
        }
    }

    /// Titles strictly above `level`, joined with [`CATEGORY_SEPARATOR`].
    fn category(&self, level: u8) -> String {
        let depth = usize::from(level).min(self.titles.len());
        self.titles[..depth].join(CATEGORY_SEPARATOR)
    }
}

/// Build one task per export-enabled node with a non-blank title, in tree order.
///
/// Nodes with blank titles are skipped outright. Export-disabled nodes produce
/// no task but still update the breadcrumb, so their descendants keep the
/// correct category.
pub fn project_tasks(nodes: &[WbsNode], project: &str, created_at: DateTime<Utc>) -> Vec<NewTask> {
    let mut breadcrumb = Breadcrumb::default();
    let mut tasks = Vec::new();

    for node in nodes.iter().filter(|n| !n.title.trim().is_empty()) {
        breadcrumb.visit(node.level, &node.title);

        if !node.include_in_export {
            continue;
        }

        tasks.push(NewTask {
            title: node.title.clone(),
            description: describe(node),
            project: project.to_string(),
            category: breadcrumb.category(node.level),
            priority: node.priority,
            responsible_id: node.responsible_id.clone(),
            status: TaskStatus::initial(),
            checklist: Vec::new(),
            bugs: Vec::new(),
            created_at,
        });
    }

    tasks
}

/// Export a tree, enforcing the export preconditions.
///
/// Fails with [`WbsError::MissingProjectTitle`] when the project title is blank
/// and with [`WbsError::NothingToExport`] when no node qualifies.
pub fn export_tasks(nodes: &[WbsNode], project: &str) -> Result<Vec<NewTask>> {
    let project = project.trim();
    if project.is_empty() {
        return Err(WbsError::MissingProjectTitle);
    }

    let tasks = project_tasks(nodes, project, Utc::now());
    if tasks.is_empty() {
        return Err(WbsError::NothingToExport);
    }

    tracing::info!("Exporting {} tasks for project {}", tasks.len(), project);
    Ok(tasks)
}

fn describe(node: &WbsNode) -> String {
    let base = if node.description.trim().is_empty() {
        &node.title
    } else {
        &node.description
    };

    match node.schedule {
        Some(range) => format!(
            "{} {} [일정: {} ~ {} ({}일)]",
            WBS_TAG,
            base,
            range.start,
            range.end,
            range.days()
        ),
        None => format!("{} {}", WBS_TAG, base),
    }
}
