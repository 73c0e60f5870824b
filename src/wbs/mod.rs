//! Work breakdown structure editing.
//!
//! - [`tree`]: the level-encoded tree and its structural operations
//! - [`toggle`]: how a calendar click changes a leaf's date range
//! - [`rollup`]: bottom-up aggregation of child ranges into parents
//! - [`export`]: projection of a tree into kanban task records
//! - [`calendar`]: the day grid a plan is scheduled on
//! - [`plan`]: an editing session tying the above together
//! - [`render`]: ASCII views of a tree

pub mod calendar;
pub mod export;
pub mod plan;
pub mod render;
pub mod rollup;
pub mod toggle;
pub mod tree;

pub use calendar::{CalendarDay, CalendarMonth, CalendarRange, CalendarWeek};
pub use export::{export_tasks, project_tasks};
pub use plan::Plan;
pub use render::{render_gantt, render_tree};
pub use rollup::rollup;
pub use toggle::toggle;
pub use tree::{ClickOutcome, IgnoredReason, WbsTree};
