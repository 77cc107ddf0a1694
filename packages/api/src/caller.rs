// ABOUTME: Caller identity extraction from request headers
// ABOUTME: X-Caller-Id and X-Caller-Role stand in for an external auth layer

use std::str::FromStr;

use axum::{extract::FromRequestParts, http::request::Parts};

use curbside_identity::{CallerIdentity, Role};

use crate::response::ApiError;

pub const CALLER_ID_HEADER: &str = "x-caller-id";
pub const CALLER_ROLE_HEADER: &str = "x-caller-role";

/// Extracts the calling user from `X-Caller-Id` / `X-Caller-Role`.
/// Both headers are required on mutating routes.
pub struct Caller(pub CallerIdentity);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(CALLER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ApiError::unauthorized("Missing X-Caller-Id header"))?;

        let role = parts
            .headers
            .get(CALLER_ROLE_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Missing X-Caller-Role header"))?;
        let role = Role::from_str(role)
            .map_err(|_| ApiError::unauthorized(format!("Unknown caller role: {}", role)))?;

        Ok(Caller(CallerIdentity::new(user_id, role)))
    }
}
