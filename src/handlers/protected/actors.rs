use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Extension, Path, State},
};

use super::utils::{fields_from, json_object, record_id, subject};
use crate::app::AppState;
use crate::auth::Claims;
use crate::database::{ActorFields, Record};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /actors - All actors
pub async fn list(State(state): State<AppState>) -> ApiResult {
    let actors = state.actors.list().await?;
    Ok(ApiResponse::success().with("actors", actors))
}

/// POST /actors - Create an actor from any of name, age, gender
pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    body: Bytes,
) -> ApiResult {
    let payload = json_object(&body)?;
    if !ActorFields::CREATE_KEYS.iter().any(|key| payload.contains_key(*key)) {
        return Err(ApiError::Unprocessable);
    }

    let fields: ActorFields = fields_from(payload)?;
    let actor = state.actors.create(fields).await?;

    tracing::info!("{} created actor {}", subject(&claims), actor.id());
    Ok(ApiResponse::success().with("actor", actor))
}

/// PATCH /actors/:id - Overwrite the supplied, non-null fields
pub async fn update(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    id: Result<Path<i64>, PathRejection>,
    body: Bytes,
) -> ApiResult {
    let id = record_id(id)?;
    let mut actor = state.actors.get(id).await?.ok_or(ApiError::NotFound)?;

    let fields: ActorFields = fields_from(json_object(&body)?)?;
    actor.apply(fields);
    state.actors.update(&actor).await?;

    tracing::info!("{} updated actor {}", subject(&claims), id);
    Ok(ApiResponse::success().with("id", id))
}

/// DELETE /actors/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult {
    let id = record_id(id)?;
    state.actors.get(id).await?.ok_or(ApiError::NotFound)?;
    state.actors.delete(id).await?;

    tracing::info!("{} deleted actor {}", subject(&claims), id);
    Ok(ApiResponse::success().with("deleted_id", id))
}
