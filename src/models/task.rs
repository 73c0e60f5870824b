use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::node::Priority;

/// A kanban task ("demand") produced by exporting a plan.
///
/// This is the record handed to the task store. The store assigns the `id`;
/// everything else comes from the exported node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewTask {
    pub title: String,
    /// Node description (or title) tagged as WBS output, plus the schedule when present.
    pub description: String,
    pub project: String,
    /// Breadcrumb of ancestor titles, e.g. `"Phase 1 > Planning"`. Empty for root nodes.
    pub category: String,
    pub priority: Priority,
    pub responsible_id: Option<String>,
    pub status: TaskStatus,
    pub checklist: Vec<ChecklistItem>,
    /// Bug reports are managed by the board, exported tasks start with none.
    pub bugs: Vec<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// A task as stored on the board.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: Uuid,
    #[serde(flatten)]
    pub task: NewTask,
}

/// The kanban column a task sits in.
///
/// - `Queued`: Waiting to be picked up
/// - `Pending`: In progress
/// - `Resolved`: Done
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Queued,
    Pending,
    Resolved,
}

impl TaskStatus {
    /// The least-progressed column, where new tasks land.
    pub fn initial() -> Self {
        Self::Queued
    }
}

/// One checklist entry of a task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChecklistItem {
    pub item: String,
    pub done: bool,
}
