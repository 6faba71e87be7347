//! Tag API endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};

use super::{created, ensure_same_id, AppJson, OwnerQuery};
use crate::errors::AppError;
use crate::models::{Tag, TagRequest};
use crate::AppState;

/// GET /api/tags - List tags.
pub async fn list_tags(
    State(state): State<AppState>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<Vec<Tag>>, AppError> {
    Ok(Json(state.repo.list_tags(query.owner()).await?))
}

/// GET /api/tags/:id - Get a single tag.
pub async fn get_tag(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Tag>, AppError> {
    state
        .repo
        .get_tag(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Tag {} not found", id)))
}

/// POST /api/tags - Create a new tag.
pub async fn create_tag(
    State(state): State<AppState>,
    AppJson(request): AppJson<TagRequest>,
) -> Result<Response, AppError> {
    let request = request.normalized();
    request.validate()?;

    let tag = state.repo.create_tag(&request).await?;
    Ok(created(format!("/api/tags/{}", tag.id), tag))
}

/// PUT /api/tags/:id - Replace a tag.
pub async fn update_tag(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(request): AppJson<TagRequest>,
) -> Result<StatusCode, AppError> {
    ensure_same_id(&id, request.id.as_deref())?;
    let request = request.normalized();
    request.validate()?;

    state.repo.update_tag(&id, &request).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/tags/:id - Delete a tag.
pub async fn delete_tag(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.repo.delete_tag(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
