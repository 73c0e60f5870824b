//! A plan editing session: project metadata, calendar, roster and tree.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::calendar::CalendarRange;
use super::export;
use super::tree::{ClickOutcome, IgnoredReason, WbsTree};
use crate::error::{Result, WbsError};
use crate::models::{
    find_person, DateRange, NewTask, NodePosition, NodeView, Person, PlanSummary, Priority,
    UpdateNodeInput, UpdatePlanInput, WbsNode,
};

/// One WBS editing session.
///
/// A plan lives in memory while it is edited and is only turned into kanban
/// tasks by an explicit [`Plan::export`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default)]
    pub project_title: String,
    #[serde(default)]
    pub calendar: CalendarRange,
    #[serde(default, rename = "nodes")]
    pub tree: WbsTree,
    #[serde(default)]
    pub roster: Vec<Person>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Plan {
    pub fn new(project_title: impl Into<String>, calendar: CalendarRange) -> Result<Self> {
        calendar.validate()?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            project_title: project_title.into(),
            calendar,
            tree: WbsTree::new(),
            roster: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// The demo plan shown to first-time users: one phase, one activity, one task.
    ///
    /// The rows are scheduled from the first day of `calendar`.
    pub fn sample(calendar: CalendarRange) -> Result<Self> {
        let (start, _) = calendar.bounds()?;
        let mut plan = Self::new("", calendar)?;

        let rows = [
            (0, "Phase 1", "요구사항 분석 및 개발 계획 수립", Priority::High, 10),
            (1, "기획", "분석 및 설계", Priority::High, 5),
            (2, "기획자", "요구 사항 정의", Priority::Medium, 3),
        ];

        let nodes = rows
            .into_iter()
            .map(|(level, title, description, priority, days)| {
                let mut node = WbsNode::new(level);
                node.title = title.to_string();
                node.description = description.to_string();
                node.priority = priority;
                node.schedule = DateRange::new(start, start + chrono::Days::new(days - 1));
                node
            })
            .collect();

        plan.tree = WbsTree::from_nodes(nodes)?;
        Ok(plan)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn summary(&self) -> PlanSummary {
        let span = self
            .tree
            .nodes()
            .iter()
            .filter_map(|n| n.schedule)
            .reduce(|acc, range| acc.cover(&range));
        PlanSummary {
            id: self.id,
            project_title: self.project_title.clone(),
            node_count: self.tree.len(),
            span,
            updated_at: self.updated_at,
        }
    }

    pub fn set_project_title(&mut self, title: impl Into<String>) {
        self.project_title = title.into();
        self.touch();
    }

    /// Move the grid to another span of months. Existing schedules are kept.
    pub fn set_calendar(&mut self, calendar: CalendarRange) -> Result<()> {
        calendar.validate()?;
        self.calendar = calendar;
        self.touch();
        Ok(())
    }

    /// Apply project-level edits. The calendar is validated before anything changes.
    pub fn update(&mut self, input: UpdatePlanInput) -> Result<()> {
        if input.touches_calendar() {
            self.set_calendar(CalendarRange {
                year: input.year.unwrap_or(self.calendar.year),
                start_month: input.start_month.unwrap_or(self.calendar.start_month),
                end_month: input.end_month.unwrap_or(self.calendar.end_month),
            })?;
        }
        if let Some(title) = input.project_title {
            self.set_project_title(title);
        }
        if let Some(roster) = input.roster {
            self.roster = roster;
        }
        self.touch();
        Ok(())
    }

    /// Clear the project title and start over from a single blank row.
    pub fn reset(&mut self) {
        self.project_title.clear();
        self.tree = WbsTree::new();
        self.touch();
        tracing::info!("Plan {} reset", self.id);
    }

    pub fn add_node(&mut self, reference: Option<Uuid>, position: NodePosition) -> Result<NodeView> {
        let id = self.tree.add_node(reference, position)?;
        self.touch();
        self.tree.view(id)
    }

    pub fn remove_node(&mut self, id: Uuid) -> Result<Vec<Uuid>> {
        let removed = self.tree.remove_node(id)?;
        self.touch();
        Ok(removed)
    }

    pub fn change_level(&mut self, id: Uuid, delta: i32) -> Result<NodeView> {
        self.tree.change_level(id, delta)?;
        self.touch();
        self.tree.view(id)
    }

    /// Update a node, checking that any new responsible person is on the roster.
    pub fn update_node(&mut self, id: Uuid, input: UpdateNodeInput) -> Result<NodeView> {
        if let Some(person_id) = input.responsible_id.as_deref() {
            let person_id = person_id.trim();
            let unassigned = person_id.is_empty() || person_id == "unassigned";
            if !unassigned && find_person(&self.roster, person_id).is_none() {
                return Err(WbsError::UnknownPerson(person_id.to_string()));
            }
        }
        let view = self.tree.update_node(id, input)?;
        self.touch();
        Ok(view)
    }

    pub fn set_export_flag(&mut self, id: Uuid, include: bool) -> Result<NodeView> {
        let view = self.tree.set_export_flag(id, include)?;
        self.touch();
        Ok(view)
    }

    /// Apply a calendar click. Dates outside the grid are ignored.
    pub fn click_cell(&mut self, id: Uuid, date: NaiveDate) -> Result<ClickOutcome> {
        self.tree.index_of(id)?;
        if !self.calendar.contains(date) {
            return Ok(ClickOutcome::Ignored {
                reason: IgnoredReason::OutsideCalendar,
            });
        }

        let outcome = self.tree.click_cell(id, date)?;
        if matches!(outcome, ClickOutcome::Updated { .. }) {
            self.touch();
        }
        Ok(outcome)
    }

    /// Display name of a node's responsible person, if assigned and known.
    pub fn responsible_name(&self, id: Uuid) -> Result<Option<&str>> {
        let node = self.tree.get(id).ok_or(WbsError::NodeNotFound(id))?;
        Ok(node
            .responsible_id
            .as_deref()
            .and_then(|person_id| find_person(&self.roster, person_id))
            .map(|p| p.name.as_str()))
    }

    /// Turn the plan into task records. The plan itself is left unchanged.
    pub fn export(&self) -> Result<Vec<NewTask>> {
        export::export_tasks(self.tree.nodes(), &self.project_title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn roster() -> Vec<Person> {
        vec![Person {
            id: "p-1".to_string(),
            name: "Kim".to_string(),
            email: None,
        }]
    }

    #[test]
    fn sample_plan_is_rolled_up() {
        let plan = Plan::sample(CalendarRange::new(2026, 1, 3).unwrap()).unwrap();
        let nodes = plan.tree.nodes();

        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[2].duration(), 3);
        // Parents follow their only child.
        assert_eq!(nodes[0].schedule, nodes[2].schedule);
        assert_eq!(nodes[1].schedule, nodes[2].schedule);
    }

    #[test]
    fn sample_plan_starts_on_its_calendar() {
        let calendar = CalendarRange::new(2026, 5, 6).unwrap();
        let mut plan = Plan::sample(calendar).unwrap();
        let leaf = plan.tree.nodes()[2].id;

        assert_eq!(plan.calendar, calendar);
        assert_eq!(
            plan.tree.nodes()[2].schedule,
            DateRange::new(day("2026-05-01"), day("2026-05-03"))
        );

        // Inside the range, so the click collapses it to a single day.
        let outcome = plan.click_cell(leaf, day("2026-05-02")).unwrap();
        assert!(matches!(outcome, ClickOutcome::Updated { .. }));
        assert_eq!(plan.tree.nodes()[0].duration(), 1);
    }

    #[test]
    fn click_outside_calendar_is_ignored() {
        let mut plan = Plan::new("Shop", CalendarRange::new(2026, 1, 1).unwrap()).unwrap();
        let id = plan.tree.nodes()[0].id;

        let outcome = plan.click_cell(id, day("2026-02-01")).unwrap();

        assert_eq!(
            outcome,
            ClickOutcome::Ignored {
                reason: IgnoredReason::OutsideCalendar
            }
        );
        assert!(plan.tree.nodes()[0].schedule.is_none());
    }

    #[test]
    fn responsible_must_be_on_roster() {
        let mut plan = Plan::new("Shop", CalendarRange::default()).unwrap();
        plan.roster = roster();
        let id = plan.tree.nodes()[0].id;

        let err = plan
            .update_node(
                id,
                UpdateNodeInput {
                    responsible_id: Some("p-9".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert_eq!(err, WbsError::UnknownPerson("p-9".to_string()));

        plan.update_node(
            id,
            UpdateNodeInput {
                responsible_id: Some("p-1".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(plan.responsible_name(id).unwrap(), Some("Kim"));
    }

    #[test]
    fn calendar_update_is_validated() {
        let mut plan = Plan::new("Shop", CalendarRange::new(2026, 1, 3).unwrap()).unwrap();

        let err = plan
            .update(UpdatePlanInput {
                start_month: Some(5),
                ..Default::default()
            })
            .unwrap_err();

        assert!(matches!(err, WbsError::InvalidCalendarRange { .. }));
        assert_eq!(plan.calendar.start_month, 1);
    }

    #[test]
    fn setters_update_title_and_calendar() {
        let mut plan = Plan::new("Shop", CalendarRange::new(2026, 1, 3).unwrap()).unwrap();

        plan.set_project_title("Store Launch");
        plan.set_calendar(CalendarRange::new(2026, 4, 6).unwrap())
            .unwrap();
        let err = plan
            .set_calendar(CalendarRange {
                year: 2026,
                start_month: 9,
                end_month: 13,
            })
            .unwrap_err();

        assert_eq!(plan.project_title, "Store Launch");
        assert_eq!(plan.calendar, CalendarRange::new(2026, 4, 6).unwrap());
        assert!(matches!(err, WbsError::InvalidCalendarRange { .. }));
    }

    #[test]
    fn reset_leaves_one_blank_row() {
        let mut plan = Plan::sample(CalendarRange::new(2026, 1, 3).unwrap()).unwrap();
        plan.project_title = "Shop".to_string();

        plan.reset();

        assert!(plan.project_title.is_empty());
        assert_eq!(plan.tree.len(), 1);
        assert!(plan.tree.nodes()[0].title.is_empty());
    }

    #[test]
    fn plan_round_trips_through_json_file_format() {
        let json = r#"{
            "project_title": "Shop",
            "calendar": {"year": 2026, "start_month": 1, "end_month": 2},
            "nodes": [
                {"title": "Phase 1"},
                {"title": "Build", "level": 1,
                 "schedule": {"start": "2026-01-05", "end": "2026-01-09"}}
            ]
        }"#;

        let plan: Plan = serde_json::from_str(json).unwrap();

        assert_eq!(plan.tree.len(), 2);
        assert_eq!(plan.tree.nodes()[0].duration(), 5);
        assert_eq!(plan.export().unwrap().len(), 2);
    }
}
