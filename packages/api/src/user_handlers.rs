// ABOUTME: HTTP request handlers for platform users
// ABOUTME: Role-tagged identity records; mutations require the ManageUsers capability

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
    Json,
};
use serde::Deserialize;
use tracing::info;

use curbside_identity::{Capability, Role, UserCreateInput, UserUpdateInput};

use crate::caller::Caller;
use crate::db::DbState;
use crate::response::{ApiError, ApiResponse, HandlerResult};

#[derive(Deserialize)]
pub struct UserListQuery {
    pub role: Option<Role>,
}

pub async fn create_user(
    State(db): State<DbState>,
    Caller(caller): Caller,
    Json(input): Json<UserCreateInput>,
) -> HandlerResult<impl IntoResponse> {
    if !caller.can(Capability::ManageUsers) {
        return Err(ApiError::forbidden("Caller may not manage users"));
    }
    info!("Creating user with role {}", input.role);

    let user = db.user_storage.create_user(input).await?;
    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(user))))
}

pub async fn get_user(
    State(db): State<DbState>,
    Path(id): Path<String>,
) -> HandlerResult<impl IntoResponse> {
    let user = db
        .user_storage
        .get_user(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("User not found: {}", id)))?;

    Ok(ResponseJson(ApiResponse::success(user)))
}

pub async fn list_users(
    State(db): State<DbState>,
    Query(query): Query<UserListQuery>,
) -> HandlerResult<impl IntoResponse> {
    let users = match query.role {
        Some(role) => db.user_storage.list_users_by_role(role).await?,
        None => db.user_storage.list_users().await?,
    };

    Ok(ResponseJson(ApiResponse::success(users)))
}

pub async fn update_user(
    State(db): State<DbState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    Json(input): Json<UserUpdateInput>,
) -> HandlerResult<impl IntoResponse> {
    if !caller.can(Capability::ManageUsers) {
        return Err(ApiError::forbidden("Caller may not manage users"));
    }

    let user = db.user_storage.update_user(&id, input).await?;
    Ok(ResponseJson(ApiResponse::success(user)))
}

pub async fn delete_user(
    State(db): State<DbState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> HandlerResult<impl IntoResponse> {
    if !caller.can(Capability::ManageUsers) {
        return Err(ApiError::forbidden("Caller may not manage users"));
    }

    db.user_storage.delete_user(&id).await?;
    Ok(ResponseJson(ApiResponse::success(serde_json::json!({ "deleted": id }))))
}
