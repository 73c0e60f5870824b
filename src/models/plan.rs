use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::node::DateRange;
use super::person::Person;

/// Input for creating a new plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePlanInput {
    #[serde(default)]
    pub project_title: String,
    /// Calendar year shown in the grid. Defaults to the configured year.
    pub year: Option<i32>,
    pub start_month: Option<u32>,
    pub end_month: Option<u32>,
    /// People that nodes may be assigned to.
    #[serde(default)]
    pub roster: Vec<Person>,
    /// Start from the demo plan instead of a single blank row.
    #[serde(default)]
    pub sample: bool,
}

/// Input for updating a plan. All fields are optional for partial updates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePlanInput {
    pub project_title: Option<String>,
    pub year: Option<i32>,
    pub start_month: Option<u32>,
    pub end_month: Option<u32>,
    pub roster: Option<Vec<Person>>,
}

impl UpdatePlanInput {
    pub fn touches_calendar(&self) -> bool {
        self.year.is_some() || self.start_month.is_some() || self.end_month.is_some()
    }
}

/// Lightweight plan info for list responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSummary {
    pub id: Uuid,
    pub project_title: String,
    pub node_count: usize,
    /// Overall span of every scheduled node.
    pub span: Option<DateRange>,
    pub updated_at: DateTime<Utc>,
}
