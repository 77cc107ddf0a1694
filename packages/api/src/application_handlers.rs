// ABOUTME: HTTP request handlers for license applications
// ABOUTME: Covers listings, the details join, reviewer assignment, and the reviewer directory

use std::str::FromStr;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
};
use serde::Deserialize;
use tracing::info;

use curbside_identity::Role;
use curbside_trucks::ApplicationStatus;
use curbside_workflow::{ApplicationSortBy, SortDirection};

use crate::caller::Caller;
use crate::db::DbState;
use crate::pagination::{Page, PaginatedResponse};
use crate::response::{ApiError, ApiResponse, HandlerResult};

/// Query parameters shared by the application listings.
/// Pagination fields are inlined; serde_urlencoded cannot flatten numerics.
#[derive(Deserialize)]
pub struct ApplicationListQuery {
    pub status: Option<ApplicationStatus>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    #[serde(rename = "sortDirection")]
    pub sort_direction: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl ApplicationListQuery {
    fn page(&self) -> Page {
        Page::from_query(self.page, self.size)
    }

    fn sort(&self) -> HandlerResult<(ApplicationSortBy, SortDirection)> {
        let sort_by = match &self.sort_by {
            Some(s) => ApplicationSortBy::from_str(s).map_err(ApiError::bad_request)?,
            None => ApplicationSortBy::default(),
        };
        let direction = match &self.sort_direction {
            Some(s) => SortDirection::from_str(s).map_err(ApiError::bad_request)?,
            None => SortDirection::default(),
        };
        Ok((sort_by, direction))
    }
}

/// List applications, optionally filtered by status
pub async fn list_applications(
    State(db): State<DbState>,
    Query(query): Query<ApplicationListQuery>,
) -> HandlerResult<impl IntoResponse> {
    let (sort_by, direction) = query.sort()?;
    let page = query.page();

    let (applications, total) = db
        .workflow_storage
        .list_applications(query.status, sort_by, direction, page.limit(), page.offset())
        .await?;

    Ok(ResponseJson(ApiResponse::success(PaginatedResponse::new(applications, page, total))))
}

/// List applications joined with truck, brand, vendor, and reviewer details
pub async fn list_applications_with_details(
    State(db): State<DbState>,
    Query(query): Query<ApplicationListQuery>,
) -> HandlerResult<impl IntoResponse> {
    let (sort_by, direction) = query.sort()?;
    let page = query.page();

    let (details, total) = db
        .workflow_storage
        .list_applications_with_details(
            query.status,
            sort_by,
            direction,
            page.limit(),
            page.offset(),
        )
        .await?;

    Ok(ResponseJson(ApiResponse::success(PaginatedResponse::new(details, page, total))))
}

/// List applications with no reviewer assigned yet
pub async fn list_unassigned_applications(
    State(db): State<DbState>,
    Query(query): Query<ApplicationListQuery>,
) -> HandlerResult<impl IntoResponse> {
    let (sort_by, direction) = query.sort()?;
    let page = query.page();

    let (applications, total) = db
        .workflow_storage
        .list_unassigned_applications(sort_by, direction, page.limit(), page.offset())
        .await?;

    Ok(ResponseJson(ApiResponse::success(PaginatedResponse::new(applications, page, total))))
}

/// Directory of users holding the REVIEWER role
pub async fn list_reviewers(State(db): State<DbState>) -> HandlerResult<impl IntoResponse> {
    let reviewers = db.user_storage.list_users_by_role(Role::Reviewer).await?;
    Ok(ResponseJson(ApiResponse::success(reviewers)))
}

/// Get a single application by ID
pub async fn get_application(
    State(db): State<DbState>,
    Path(id): Path<String>,
) -> HandlerResult<impl IntoResponse> {
    let application = db
        .workflow_storage
        .get_application(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Application not found: {}", id)))?;

    Ok(ResponseJson(ApiResponse::success(application)))
}

/// Assign (or re-assign) a reviewer to an application
pub async fn assign_reviewer(
    State(db): State<DbState>,
    Caller(caller): Caller,
    Path((id, reviewer_id)): Path<(String, String)>,
) -> HandlerResult<impl IntoResponse> {
    info!("Assigning reviewer {} to application {}", reviewer_id, id);

    let application = db.engine.assign_reviewer(&caller, &id, &reviewer_id).await?;
    Ok(ResponseJson(ApiResponse::success(application)))
}

/// Food trucks whose application holds the given status, with owner details
pub async fn list_trucks_by_status(
    State(db): State<DbState>,
    Path(status): Path<String>,
) -> HandlerResult<impl IntoResponse> {
    let status = ApplicationStatus::from_str(&status).map_err(ApiError::bad_request)?;
    let trucks = db
        .workflow_storage
        .list_trucks_by_application_status(status)
        .await?;

    Ok(ResponseJson(ApiResponse::success(trucks)))
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        ResponseJson(ApiResponse::success(serde_json::json!({ "status": "ok" }))),
    )
}
