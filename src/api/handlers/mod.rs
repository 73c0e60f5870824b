use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::WbsError;
use crate::models::*;
use crate::store::PlanStore;
use crate::wbs::{CalendarMonth, CalendarRange, CalendarWeek, ClickOutcome, Plan};

// ============================================================
// Error Handling
// ============================================================

/// Map a planner error to a response.
///
/// Missing plans or nodes are 404s and rejected edits are 400s, both with the
/// error message as body. Task store failures are logged server-side and
/// clients only see a generic message.
fn api_error(e: WbsError) -> (StatusCode, String) {
    match e {
        e if e.is_not_found() => (StatusCode::NOT_FOUND, e.to_string()),
        WbsError::TaskStore(msg) => {
            tracing::error!("Internal error: {}", msg);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
        e => {
            tracing::warn!("Validation error: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string())
        }
    }
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Plans
// ============================================================

pub async fn list_plans(State(store): State<PlanStore>) -> Json<Vec<PlanSummary>> {
    Json(store.list_plans())
}

pub async fn create_plan(
    State(store): State<PlanStore>,
    Json(input): Json<CreatePlanInput>,
) -> Result<(StatusCode, Json<Plan>), (StatusCode, String)> {
    store
        .create_plan(input)
        .map(|p| (StatusCode::CREATED, Json(p)))
        .map_err(api_error)
}

pub async fn get_plan(
    State(store): State<PlanStore>,
    Path(id): Path<Uuid>,
) -> Result<Json<Plan>, (StatusCode, String)> {
    store
        .get_plan(id)
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Plan not found".to_string()))
}

pub async fn update_plan(
    State(store): State<PlanStore>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdatePlanInput>,
) -> Result<Json<Plan>, (StatusCode, String)> {
    store.update_plan(id, input).map(Json).map_err(api_error)
}

pub async fn delete_plan(
    State(store): State<PlanStore>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    if store.delete_plan(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "Plan not found".to_string()))
    }
}

pub async fn reset_plan(
    State(store): State<PlanStore>,
    Path(id): Path<Uuid>,
) -> Result<Json<Plan>, (StatusCode, String)> {
    store
        .with_plan(id, |plan| {
            plan.reset();
            Ok(plan.clone())
        })
        .map(Json)
        .map_err(api_error)
}

/// Grid layout for a plan's calendar.
#[derive(Debug, Serialize)]
pub struct CalendarGrid {
    pub range: CalendarRange,
    pub months: Vec<CalendarMonth>,
    pub weeks: Vec<CalendarWeek>,
}

pub async fn get_calendar(
    State(store): State<PlanStore>,
    Path(id): Path<Uuid>,
) -> Result<Json<CalendarGrid>, (StatusCode, String)> {
    let plan = store
        .get_plan(id)
        .ok_or((StatusCode::NOT_FOUND, "Plan not found".to_string()))?;

    Ok(Json(CalendarGrid {
        range: plan.calendar,
        months: plan.calendar.months(),
        weeks: plan.calendar.weeks(),
    }))
}

pub async fn export_plan(
    State(store): State<PlanStore>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<Vec<Task>>), (StatusCode, String)> {
    store
        .export_plan(id)
        .map(|tasks| (StatusCode::CREATED, Json(tasks)))
        .map_err(api_error)
}

// ============================================================
// Nodes
// ============================================================

pub async fn list_nodes(
    State(store): State<PlanStore>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<NodeView>>, (StatusCode, String)> {
    store
        .with_plan(id, |plan| Ok(plan.tree.views()))
        .map(Json)
        .map_err(api_error)
}

pub async fn add_node(
    State(store): State<PlanStore>,
    Path(id): Path<Uuid>,
    Json(input): Json<AddNodeInput>,
) -> Result<(StatusCode, Json<NodeView>), (StatusCode, String)> {
    store
        .with_plan(id, |plan| plan.add_node(input.reference_id, input.position))
        .map(|node| (StatusCode::CREATED, Json(node)))
        .map_err(api_error)
}

pub async fn update_node(
    State(store): State<PlanStore>,
    Path((id, node_id)): Path<(Uuid, Uuid)>,
    Json(input): Json<UpdateNodeInput>,
) -> Result<Json<NodeView>, (StatusCode, String)> {
    store
        .with_plan(id, |plan| plan.update_node(node_id, input))
        .map(Json)
        .map_err(api_error)
}

pub async fn remove_node(
    State(store): State<PlanStore>,
    Path((id, node_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, (StatusCode, String)> {
    store
        .with_plan(id, |plan| plan.remove_node(node_id))
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(api_error)
}

pub async fn change_level(
    State(store): State<PlanStore>,
    Path((id, node_id)): Path<(Uuid, Uuid)>,
    Json(input): Json<ChangeLevelInput>,
) -> Result<Json<NodeView>, (StatusCode, String)> {
    store
        .with_plan(id, |plan| plan.change_level(node_id, input.delta))
        .map(Json)
        .map_err(api_error)
}

pub async fn set_export_flag(
    State(store): State<PlanStore>,
    Path((id, node_id)): Path<(Uuid, Uuid)>,
    Json(input): Json<ExportFlagInput>,
) -> Result<Json<NodeView>, (StatusCode, String)> {
    store
        .with_plan(id, |plan| plan.set_export_flag(node_id, input.include_in_export))
        .map(Json)
        .map_err(api_error)
}

pub async fn click_cell(
    State(store): State<PlanStore>,
    Path((id, node_id)): Path<(Uuid, Uuid)>,
    Json(input): Json<CellClickInput>,
) -> Result<Json<ClickOutcome>, (StatusCode, String)> {
    store
        .with_plan(id, |plan| plan.click_cell(node_id, input.date))
        .map(Json)
        .map_err(api_error)
}

// ============================================================
// Board
// ============================================================

pub async fn list_tasks(
    State(store): State<PlanStore>,
) -> Result<Json<Vec<Task>>, (StatusCode, String)> {
    store.list_tasks().map(Json).map_err(api_error)
}
