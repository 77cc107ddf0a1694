// ABOUTME: HTTP request handlers for vendors and their brands
// ABOUTME: Registration, profile updates, and restrict-delete over owned children

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
    Json,
};
use tracing::info;

use curbside_vendors::{BrandCreateInput, VendorCreateInput, VendorUpdateInput};

use crate::db::DbState;
use crate::response::{ApiError, ApiResponse, HandlerResult};

/// Register a new vendor
pub async fn create_vendor(
    State(db): State<DbState>,
    Json(input): Json<VendorCreateInput>,
) -> HandlerResult<impl IntoResponse> {
    info!("Registering vendor: {}", input.name);

    let vendor = db.vendor_storage.create_vendor(input).await?;
    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(vendor))))
}

pub async fn get_vendor(
    State(db): State<DbState>,
    Path(id): Path<String>,
) -> HandlerResult<impl IntoResponse> {
    let vendor = db
        .vendor_storage
        .get_vendor(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Vendor not found: {}", id)))?;

    Ok(ResponseJson(ApiResponse::success(vendor)))
}

pub async fn list_vendors(State(db): State<DbState>) -> HandlerResult<impl IntoResponse> {
    let vendors = db.vendor_storage.list_vendors().await?;
    Ok(ResponseJson(ApiResponse::success(vendors)))
}

pub async fn update_vendor(
    State(db): State<DbState>,
    Path(id): Path<String>,
    Json(input): Json<VendorUpdateInput>,
) -> HandlerResult<impl IntoResponse> {
    let vendor = db.vendor_storage.update_vendor(&id, input).await?;
    Ok(ResponseJson(ApiResponse::success(vendor)))
}

/// Delete a vendor. Fails with 409 while the vendor still owns brands.
pub async fn delete_vendor(
    State(db): State<DbState>,
    Path(id): Path<String>,
) -> HandlerResult<impl IntoResponse> {
    db.vendor_storage.delete_vendor(&id).await?;
    Ok(ResponseJson(ApiResponse::success(serde_json::json!({ "deleted": id }))))
}

// ==================== Brands ====================

pub async fn create_brand(
    State(db): State<DbState>,
    Json(input): Json<BrandCreateInput>,
) -> HandlerResult<impl IntoResponse> {
    info!("Creating brand {} for vendor {}", input.name, input.vendor_id);

    let brand = db.vendor_storage.create_brand(input).await?;
    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(brand))))
}

pub async fn get_brand(
    State(db): State<DbState>,
    Path(id): Path<String>,
) -> HandlerResult<impl IntoResponse> {
    let brand = db
        .vendor_storage
        .get_brand(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Brand not found: {}", id)))?;

    Ok(ResponseJson(ApiResponse::success(brand)))
}

pub async fn list_brands_by_vendor(
    State(db): State<DbState>,
    Path(vendor_id): Path<String>,
) -> HandlerResult<impl IntoResponse> {
    let brands = db.vendor_storage.list_brands_by_vendor(&vendor_id).await?;
    Ok(ResponseJson(ApiResponse::success(brands)))
}

/// Delete a brand. Fails with 409 while the brand still owns food trucks.
pub async fn delete_brand(
    State(db): State<DbState>,
    Path(id): Path<String>,
) -> HandlerResult<impl IntoResponse> {
    db.vendor_storage.delete_brand(&id).await?;
    Ok(ResponseJson(ApiResponse::success(serde_json::json!({ "deleted": id }))))
}
