// ABOUTME: Shared API response types and error handling
// ABOUTME: Provides consistent response format across all API endpoints

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
};
use serde::Serialize;

use curbside_storage::StorageError;
use curbside_trucks::TruckError;
use curbside_vendors::VendorError;
use curbside_workflow::WorkflowError;

/// Standard API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

fn storage_status(e: &StorageError) -> (StatusCode, String) {
    match e {
        StorageError::NotFound => (StatusCode::NOT_FOUND, e.to_string()),
        StorageError::InvalidFormat => (StatusCode::BAD_REQUEST, e.to_string()),
        StorageError::Database(_) | StorageError::Sqlx(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Database error".to_string(),
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        ),
    }
}

pub struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.0, ResponseJson(ApiResponse::<()>::error(self.1))).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        let (status, message) = storage_status(&e);
        ApiError(status, message)
    }
}

impl From<WorkflowError> for ApiError {
    fn from(e: WorkflowError) -> Self {
        let (status, message) = match &e {
            WorkflowError::NotFound => (StatusCode::NOT_FOUND, e.to_string()),
            WorkflowError::InvalidState
            | WorkflowError::AlreadyAssigned
            | WorkflowError::NotApproved => (StatusCode::CONFLICT, e.to_string()),
            WorkflowError::InvalidAssignment => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
            WorkflowError::Forbidden => (StatusCode::FORBIDDEN, e.to_string()),
            WorkflowError::Storage(inner) => storage_status(inner),
        };
        ApiError(status, message)
    }
}

impl From<TruckError> for ApiError {
    fn from(e: TruckError) -> Self {
        let (status, message) = match &e {
            TruckError::NotFound => (StatusCode::NOT_FOUND, e.to_string()),
            TruckError::NotApproved => (StatusCode::CONFLICT, e.to_string()),
            TruckError::Storage(inner) => storage_status(inner),
        };
        ApiError(status, message)
    }
}

impl From<VendorError> for ApiError {
    fn from(e: VendorError) -> Self {
        let (status, message) = match &e {
            VendorError::NotFound => (StatusCode::NOT_FOUND, e.to_string()),
            VendorError::VendorHasBrands | VendorError::BrandHasTrucks => {
                (StatusCode::CONFLICT, e.to_string())
            }
            VendorError::Storage(inner) => storage_status(inner),
        };
        ApiError(status, message)
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError(StatusCode::BAD_REQUEST, message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError(StatusCode::UNAUTHORIZED, message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError(StatusCode::FORBIDDEN, message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError(StatusCode::NOT_FOUND, message.into())
    }
}

/// Shorthand for handlers: any domain error maps to a JSON error body.
pub type HandlerResult<T> = Result<T, ApiError>;
