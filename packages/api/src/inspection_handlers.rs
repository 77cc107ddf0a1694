// ABOUTME: HTTP request handlers for health inspections
// ABOUTME: Inspector assignment, completion with notes, and per-inspector listings

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json as ResponseJson},
    Json,
};
use serde::Deserialize;
use tracing::info;

use curbside_workflow::{InspectionOutcome, InspectionResult};

use crate::caller::Caller;
use crate::db::DbState;
use crate::response::{ApiError, ApiResponse, HandlerResult};

/// Get a single inspection by ID
pub async fn get_inspection(
    State(db): State<DbState>,
    Path(id): Path<String>,
) -> HandlerResult<impl IntoResponse> {
    let inspection = db
        .workflow_storage
        .get_inspection(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Inspection not found: {}", id)))?;

    Ok(ResponseJson(ApiResponse::success(inspection)))
}

/// Open an IN_PROGRESS inspection on an approved food truck
pub async fn assign_inspector(
    State(db): State<DbState>,
    Caller(caller): Caller,
    Path((food_truck_id, inspector_id)): Path<(String, String)>,
) -> HandlerResult<impl IntoResponse> {
    info!(
        "Assigning inspector {} to food truck {}",
        inspector_id, food_truck_id
    );

    let inspection = db
        .engine
        .assign_inspector(&caller, &food_truck_id, &inspector_id)
        .await?;
    Ok(ResponseJson(ApiResponse::success(inspection)))
}

/// Request body for completing an inspection
#[derive(Deserialize)]
pub struct CompleteInspectionRequest {
    pub result: InspectionOutcome,
    pub notes: Option<String>,
}

/// Record a terminal inspection result
pub async fn complete_inspection(
    State(db): State<DbState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    Json(request): Json<CompleteInspectionRequest>,
) -> HandlerResult<impl IntoResponse> {
    info!("Completing inspection {} with {:?}", id, request.result);

    let inspection = db
        .engine
        .complete_inspection(&caller, &id, request.result, request.notes)
        .await?;
    Ok(ResponseJson(ApiResponse::success(inspection)))
}

#[derive(Deserialize)]
pub struct InspectionListQuery {
    pub result: Option<InspectionResult>,
}

/// List inspections assigned to an inspector, optionally filtered by result
pub async fn list_inspections_by_inspector(
    State(db): State<DbState>,
    Path(inspector_id): Path<String>,
    Query(query): Query<InspectionListQuery>,
) -> HandlerResult<impl IntoResponse> {
    let inspections = db
        .workflow_storage
        .list_inspections_by_inspector(&inspector_id, query.result)
        .await?;

    Ok(ResponseJson(ApiResponse::success(inspections)))
}

/// Shortcut for an inspector's open work queue
pub async fn list_pending_inspections(
    State(db): State<DbState>,
    Path(inspector_id): Path<String>,
) -> HandlerResult<impl IntoResponse> {
    let inspections = db
        .workflow_storage
        .list_inspections_by_inspector(&inspector_id, Some(InspectionResult::InProgress))
        .await?;

    Ok(ResponseJson(ApiResponse::success(inspections)))
}

/// Aggregate counts and pass rate for an inspector
pub async fn inspector_stats(
    State(db): State<DbState>,
    Path(inspector_id): Path<String>,
) -> HandlerResult<impl IntoResponse> {
    let stats = db.workflow_storage.inspector_stats(&inspector_id).await?;
    Ok(ResponseJson(ApiResponse::success(stats)))
}

/// Platform-wide application counts and approval rate
pub async fn platform_stats(State(db): State<DbState>) -> HandlerResult<impl IntoResponse> {
    let stats = db.workflow_storage.platform_stats().await?;
    Ok(ResponseJson(ApiResponse::success(stats)))
}
