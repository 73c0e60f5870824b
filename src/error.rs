use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by plan editing and export.
///
/// All of these are recoverable: an operation that fails leaves the plan
/// exactly as it was.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WbsError {
    #[error("Plan not found: {0}")]
    PlanNotFound(Uuid),

    #[error("Node not found: {0}")]
    NodeNotFound(Uuid),

    #[error("At least one row is required")]
    LastNode,

    #[error("A plan needs at least one row")]
    EmptyTree,

    #[error("Row {index} has level {level}, expected at most {max}")]
    InvalidLevel { index: usize, level: u8, max: u8 },

    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Schedule of node {0} is not editable (it has children or is excluded from export)")]
    ScheduleNotEditable(Uuid),

    #[error("Invalid calendar range: months {start_month} to {end_month} of {year}")]
    InvalidCalendarRange {
        year: i32,
        start_month: u32,
        end_month: u32,
    },

    #[error("Unknown person: {0}")]
    UnknownPerson(String),

    #[error("Project title is required for export")]
    MissingProjectTitle,

    #[error("No tasks to export")]
    NothingToExport,

    #[error("Task store rejected the export: {0}")]
    TaskStore(String),
}

impl WbsError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PlanNotFound(_) | Self::NodeNotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, WbsError>;
