//! In-memory home of the plans being edited, and the board they export to.

mod tasks;

pub use tasks::{MemoryTaskStore, TaskStore};

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::error::{Result, WbsError};
use crate::models::{CreatePlanInput, PlanSummary, Task, UpdatePlanInput};
use crate::wbs::{CalendarRange, Plan};

/// Open editing sessions, keyed by plan id.
///
/// Every operation runs to completion while holding the lock, so edits to a
/// plan never interleave.
pub struct PlanStore {
    plans: Arc<Mutex<HashMap<Uuid, Plan>>>,
    tasks: Arc<dyn TaskStore>,
    default_calendar: CalendarRange,
}

impl PlanStore {
    pub fn new(tasks: Arc<dyn TaskStore>) -> Self {
        Self {
            plans: Arc::new(Mutex::new(HashMap::new())),
            tasks,
            default_calendar: CalendarRange::default(),
        }
    }

    /// A store exporting to a fresh in-memory board.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTaskStore::new()))
    }

    /// Calendar used for new plans that don't specify one.
    pub fn with_default_calendar(mut self, calendar: CalendarRange) -> Self {
        self.default_calendar = calendar;
        self
    }

    // ============================================================
    // Plan operations
    // ============================================================

    pub fn create_plan(&self, input: CreatePlanInput) -> Result<Plan> {
        let year = input.year.unwrap_or(self.default_calendar.year);
        let calendar = CalendarRange::new(
            year,
            input.start_month.unwrap_or(self.default_calendar.start_month),
            input.end_month.unwrap_or(self.default_calendar.end_month),
        )?;

        let mut plan = if input.sample {
            Plan::sample(calendar)?
        } else {
            Plan::new("", calendar)?
        };
        plan.project_title = input.project_title;
        plan.roster = input.roster;

        let mut plans = self.plans.lock().expect("plan store lock poisoned");
        plans.insert(plan.id, plan.clone());
        tracing::info!("Created plan {}", plan.id);
        Ok(plan)
    }

    /// All plans ordered by project title.
    pub fn list_plans(&self) -> Vec<PlanSummary> {
        let plans = self.plans.lock().expect("plan store lock poisoned");
        let mut summaries: Vec<PlanSummary> = plans.values().map(Plan::summary).collect();
        summaries.sort_by(|a, b| {
            a.project_title
                .cmp(&b.project_title)
                .then(a.updated_at.cmp(&b.updated_at))
        });
        summaries
    }

    pub fn get_plan(&self, id: Uuid) -> Option<Plan> {
        let plans = self.plans.lock().expect("plan store lock poisoned");
        plans.get(&id).cloned()
    }

    pub fn update_plan(&self, id: Uuid, input: UpdatePlanInput) -> Result<Plan> {
        self.with_plan(id, |plan| {
            plan.update(input)?;
            Ok(plan.clone())
        })
    }

    pub fn delete_plan(&self, id: Uuid) -> bool {
        let mut plans = self.plans.lock().expect("plan store lock poisoned");
        plans.remove(&id).is_some()
    }

    /// Run `f` against a plan while holding the store lock.
    pub fn with_plan<T>(&self, id: Uuid, f: impl FnOnce(&mut Plan) -> Result<T>) -> Result<T> {
        let mut plans = self.plans.lock().expect("plan store lock poisoned");
        let plan = plans.get_mut(&id).ok_or(WbsError::PlanNotFound(id))?;
        f(plan)
    }

    // ============================================================
    // Export
    // ============================================================

    /// Export a plan to the board. The plan stays open for further editing.
    pub fn export_plan(&self, id: Uuid) -> Result<Vec<Task>> {
        let records = self.with_plan(id, |plan| plan.export())?;
        let count = records.len();

        let created = self.tasks.bulk_create(records).map_err(|e| {
            tracing::error!("Task store failed during export of plan {}: {}", id, e);
            WbsError::TaskStore(e.to_string())
        })?;

        tracing::info!("Plan {} exported {} task(s) to the board", id, count);
        Ok(created)
    }

    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        self.tasks
            .list()
            .map_err(|e| WbsError::TaskStore(e.to_string()))
    }
}

impl Clone for PlanStore {
    fn clone(&self) -> Self {
        Self {
            plans: Arc::clone(&self.plans),
            tasks: Arc::clone(&self.tasks),
            default_calendar: self.default_calendar,
        }
    }
}
