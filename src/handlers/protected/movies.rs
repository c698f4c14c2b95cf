use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Extension, Path, State},
};

use super::utils::{fields_from, json_object, record_id, subject};
use crate::app::AppState;
use crate::auth::Claims;
use crate::database::{MovieFields, Record};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /movies - All movies, ordered by id
pub async fn list(State(state): State<AppState>) -> ApiResult {
    let movies = state.movies.list().await?;
    Ok(ApiResponse::success().with("movies", movies))
}

/// POST /movies - Create a movie; title and release are both required
pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    body: Bytes,
) -> ApiResult {
    let payload = json_object(&body)?;
    if !MovieFields::CREATE_KEYS.iter().all(|key| payload.contains_key(*key)) {
        return Err(ApiError::Unprocessable);
    }

    let fields: MovieFields = fields_from(payload)?;
    let movie = state.movies.create(fields).await?;

    tracing::info!("{} created movie {}", subject(&claims), movie.id());
    Ok(ApiResponse::success().with("movie", movie))
}

/// PATCH /movies/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    id: Result<Path<i64>, PathRejection>,
    body: Bytes,
) -> ApiResult {
    let id = record_id(id)?;
    let mut movie = state.movies.get(id).await?.ok_or(ApiError::NotFound)?;

    let fields: MovieFields = fields_from(json_object(&body)?)?;
    movie.apply(fields);
    state.movies.update(&movie).await?;

    tracing::info!("{} updated movie {}", subject(&claims), id);
    Ok(ApiResponse::success().with("movie_id", id))
}

/// DELETE /movies/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult {
    let id = record_id(id)?;
    state.movies.get(id).await?.ok_or(ApiError::NotFound)?;
    state.movies.delete(id).await?;

    tracing::info!("{} deleted movie {}", subject(&claims), id);
    Ok(ApiResponse::success().with("movie_id", id))
}
