// ABOUTME: HTTP request handlers for food trucks and menu items
// ABOUTME: Creation goes through the workflow engine; mutations are approval-gated in storage

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
    Json,
};
use tracing::info;

use curbside_identity::Capability;
use curbside_trucks::{
    FoodTruckCreateInput, FoodTruckUpdateInput, MenuItemCreateInput, MenuItemUpdateInput,
};

use crate::caller::Caller;
use crate::db::DbState;
use crate::response::{ApiError, ApiResponse, HandlerResult};

/// Create a food truck under a brand. Its license application is opened in
/// the same transaction, starting in SUBMITTED.
pub async fn create_truck(
    State(db): State<DbState>,
    Caller(caller): Caller,
    Path(brand_id): Path<String>,
    Json(input): Json<FoodTruckCreateInput>,
) -> HandlerResult<impl IntoResponse> {
    info!("Creating food truck under brand: {}", brand_id);

    let (truck, application) = db.engine.submit_food_truck(&caller, &brand_id, input).await?;
    let body = serde_json::json!({ "foodTruck": truck, "application": application });

    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(body))))
}

/// Get a single food truck by ID
pub async fn get_truck(
    State(db): State<DbState>,
    Path(id): Path<String>,
) -> HandlerResult<impl IntoResponse> {
    let truck = db
        .truck_storage
        .get_truck(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Food truck not found: {}", id)))?;

    Ok(ResponseJson(ApiResponse::success(truck)))
}

/// List food trucks belonging to a brand
pub async fn list_trucks_by_brand(
    State(db): State<DbState>,
    Path(brand_id): Path<String>,
) -> HandlerResult<impl IntoResponse> {
    let trucks = db.truck_storage.list_trucks_by_brand(&brand_id).await?;
    Ok(ResponseJson(ApiResponse::success(trucks)))
}

/// Update a food truck. Fails unless its application is APPROVED.
pub async fn update_truck(
    State(db): State<DbState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    Json(input): Json<FoodTruckUpdateInput>,
) -> HandlerResult<impl IntoResponse> {
    if !caller.can(Capability::ManageTrucks) {
        return Err(ApiError::forbidden("Caller may not manage food trucks"));
    }
    info!("Updating food truck: {}", id);

    let truck = db.truck_storage.update_truck(&id, input).await?;
    Ok(ResponseJson(ApiResponse::success(truck)))
}

/// Delete a food truck. Fails unless its application is APPROVED.
pub async fn delete_truck(
    State(db): State<DbState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> HandlerResult<impl IntoResponse> {
    if !caller.can(Capability::ManageTrucks) {
        return Err(ApiError::forbidden("Caller may not manage food trucks"));
    }
    info!("Deleting food truck: {}", id);

    db.truck_storage.delete_truck(&id).await?;
    Ok(ResponseJson(ApiResponse::success(serde_json::json!({ "deleted": id }))))
}

// ==================== Menu items ====================

pub async fn create_menu_item(
    State(db): State<DbState>,
    Caller(caller): Caller,
    Path(food_truck_id): Path<String>,
    Json(input): Json<MenuItemCreateInput>,
) -> HandlerResult<impl IntoResponse> {
    if !caller.can(Capability::ManageTrucks) {
        return Err(ApiError::forbidden("Caller may not manage food trucks"));
    }
    info!("Creating menu item for food truck: {}", food_truck_id);

    let item = db
        .truck_storage
        .create_menu_item(&food_truck_id, input)
        .await?;
    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(item))))
}

pub async fn list_menu_items(
    State(db): State<DbState>,
    Path(food_truck_id): Path<String>,
) -> HandlerResult<impl IntoResponse> {
    let items = db.truck_storage.list_menu_items(&food_truck_id).await?;
    Ok(ResponseJson(ApiResponse::success(items)))
}

pub async fn get_menu_item(
    State(db): State<DbState>,
    Path(id): Path<String>,
) -> HandlerResult<impl IntoResponse> {
    let item = db
        .truck_storage
        .get_menu_item(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Menu item not found: {}", id)))?;

    Ok(ResponseJson(ApiResponse::success(item)))
}

pub async fn update_menu_item(
    State(db): State<DbState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    Json(input): Json<MenuItemUpdateInput>,
) -> HandlerResult<impl IntoResponse> {
    if !caller.can(Capability::ManageTrucks) {
        return Err(ApiError::forbidden("Caller may not manage food trucks"));
    }

    let item = db.truck_storage.update_menu_item(&id, input).await?;
    Ok(ResponseJson(ApiResponse::success(item)))
}

pub async fn delete_menu_item(
    State(db): State<DbState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> HandlerResult<impl IntoResponse> {
    if !caller.can(Capability::ManageTrucks) {
        return Err(ApiError::forbidden("Caller may not manage food trucks"));
    }

    db.truck_storage.delete_menu_item(&id).await?;
    Ok(ResponseJson(ApiResponse::success(serde_json::json!({ "deleted": id }))))
}
