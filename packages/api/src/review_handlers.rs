// ABOUTME: HTTP request handlers for license reviews
// ABOUTME: Decision recording plus per-reviewer listings and stats

use std::str::FromStr;

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json as ResponseJson},
};
use serde::Deserialize;
use tracing::info;

use curbside_workflow::{ReviewDecision, ReviewStatus};

use crate::caller::Caller;
use crate::db::DbState;
use crate::pagination::{Page, PaginatedResponse};
use crate::response::{ApiError, ApiResponse, HandlerResult};

#[derive(Deserialize)]
pub struct ReviewListQuery {
    pub status: Option<ReviewStatus>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

/// Get a single review by ID
pub async fn get_review(
    State(db): State<DbState>,
    Path(id): Path<String>,
) -> HandlerResult<impl IntoResponse> {
    let review = db
        .workflow_storage
        .get_review(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Review not found: {}", id)))?;

    Ok(ResponseJson(ApiResponse::success(review)))
}

/// Record a terminal decision on a review. The decision propagates to the
/// application and its food truck in the same transaction.
pub async fn complete_review(
    State(db): State<DbState>,
    Caller(caller): Caller,
    Path((id, decision)): Path<(String, String)>,
) -> HandlerResult<impl IntoResponse> {
    let decision = ReviewDecision::from_str(&decision).map_err(ApiError::bad_request)?;
    info!("Completing review {} with {:?}", id, decision);

    let review = db.engine.complete_review(&caller, &id, decision).await?;
    Ok(ResponseJson(ApiResponse::success(review)))
}

/// List reviews assigned to a reviewer, optionally filtered by status
pub async fn list_reviews_by_reviewer(
    State(db): State<DbState>,
    Path(reviewer_id): Path<String>,
    Query(query): Query<ReviewListQuery>,
) -> HandlerResult<impl IntoResponse> {
    let page = Page::from_query(query.page, query.size);

    let (reviews, total) = db
        .workflow_storage
        .list_reviews_by_reviewer(&reviewer_id, query.status, page.limit(), page.offset())
        .await?;

    Ok(ResponseJson(ApiResponse::success(PaginatedResponse::new(
        reviews, page, total,
    ))))
}

/// Shortcut for a reviewer's open work queue
pub async fn list_pending_reviews(
    State(db): State<DbState>,
    Path(reviewer_id): Path<String>,
) -> HandlerResult<impl IntoResponse> {
    let (reviews, _) = db
        .workflow_storage
        .list_reviews_by_reviewer(
            &reviewer_id,
            Some(ReviewStatus::InProgress),
            crate::pagination::MAX_PAGE_SIZE,
            0,
        )
        .await?;

    Ok(ResponseJson(ApiResponse::success(reviews)))
}

/// Aggregate counts and approval rate for a reviewer
pub async fn reviewer_stats(
    State(db): State<DbState>,
    Path(reviewer_id): Path<String>,
) -> HandlerResult<impl IntoResponse> {
    let stats = db.workflow_storage.reviewer_stats(&reviewer_id).await?;
    Ok(ResponseJson(ApiResponse::success(stats)))
}
