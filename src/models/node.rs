use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Deepest nesting level a node may have (four levels: 0 through 3).
pub const MAX_LEVEL: u8 = 3;

/// One row of a work breakdown structure.
///
/// Nodes live in a single ordered sequence (depth-first pre-order). There are
/// no parent pointers: nesting is implied by the `level` of adjacent rows, so a
/// node's children are the following rows one level deeper, up to the first
/// row at its own level or shallower.
///
/// A node that has children never carries a schedule of its own. Its
/// `schedule` is always the rolled-up span of its children's schedules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WbsNode {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default)]
    pub level: u8,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    /// Person from the roster responsible for this node. `None` means unassigned.
    #[serde(default)]
    pub responsible_id: Option<String>,
    /// Scheduled date range. `None` means unscheduled.
    #[serde(default)]
    pub schedule: Option<DateRange>,
    /// Whether export emits a task for this node.
    #[serde(default = "default_true")]
    pub include_in_export: bool,
    /// Presentation-only: whether the row is expanded in the editor.
    #[serde(default = "default_true")]
    pub expanded: bool,
}

fn default_true() -> bool {
    true
}

impl WbsNode {
    /// Create a blank, unscheduled, export-enabled node at the given level.
    pub fn new(level: u8) -> Self {
        Self {
            id: Uuid::new_v4(),
            level: level.min(MAX_LEVEL),
            title: String::new(),
            description: String::new(),
            priority: Priority::default(),
            responsible_id: None,
            schedule: None,
            include_in_export: true,
            expanded: true,
        }
    }

    /// Inclusive day count of the schedule, `0` when unscheduled.
    pub fn duration(&self) -> i64 {
        self.schedule.map_or(0, |range| range.days())
    }

    pub fn is_scheduled(&self) -> bool {
        self.schedule.is_some()
    }
}

/// An inclusive range of calendar days.
///
/// Serialized as `{"start": "YYYY-MM-DD", "end": "YYYY-MM-DD"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Returns `None` when `end` is before `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }

    pub fn is_single_day(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Inclusive day count.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Smallest range covering both `self` and `other`, including any gap between them.
    pub fn cover(&self, other: &DateRange) -> DateRange {
        DateRange {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// Priority carried through to exported tasks.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

/// Where a new node goes relative to its reference node.
///
/// - `Sibling`: right after the reference, at the same level
/// - `Child`: right after the reference, one level deeper (capped at [`MAX_LEVEL`])
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NodePosition {
    #[default]
    Sibling,
    Child,
}

/// Input for adding a node.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddNodeInput {
    /// Node to insert after. `None` appends a root node at the end.
    pub reference_id: Option<Uuid>,
    #[serde(default)]
    pub position: NodePosition,
}

/// Input for updating a node. All fields are optional for partial updates.
///
/// Only `schedule` and `clear_schedule` affect dates; the other fields are
/// plain text or metadata edits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateNodeInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    /// Responsible person. An empty string or `"unassigned"` clears the assignment.
    pub responsible_id: Option<String>,
    pub schedule: Option<DateRange>,
    /// Drop the node's schedule. Ignored when `schedule` is also set.
    #[serde(default)]
    pub clear_schedule: bool,
    pub expanded: Option<bool>,
}

impl UpdateNodeInput {
    /// Whether applying this update can change any node's dates.
    pub fn touches_schedule(&self) -> bool {
        self.schedule.is_some() || self.clear_schedule
    }
}

/// Input for indenting (`delta > 0`) or outdenting (`delta < 0`) a node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeLevelInput {
    pub delta: i32,
}

/// Input for toggling whether a node is exported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportFlagInput {
    pub include_in_export: bool,
}

/// Input for a click on a calendar cell of a node's row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellClickInput {
    pub date: NaiveDate,
}

/// A node with its derived fields, used for API responses.
///
/// The `node` fields are flattened into the JSON response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeView {
    #[serde(flatten)]
    pub node: WbsNode,
    pub duration: i64,
    pub has_children: bool,
}
