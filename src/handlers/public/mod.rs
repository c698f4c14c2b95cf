// handlers/public/mod.rs - Endpoints that need no token
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// GET / - liveness probe
pub async fn root() -> ApiResult {
    Ok(ApiResponse::success())
}

/// Fallback for paths no route matches
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
