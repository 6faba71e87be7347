//! List API endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};

use super::{created, ensure_same_id, AppJson, OwnerQuery};
use crate::errors::AppError;
use crate::models::{ListRequest, TaskList};
use crate::AppState;

/// GET /api/lists - List lists, scoped to `userId` plus templates when given.
pub async fn list_lists(
    State(state): State<AppState>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<Vec<TaskList>>, AppError> {
    Ok(Json(state.repo.list_lists(query.owner()).await?))
}

/// GET /api/lists/:id - Get a single list.
pub async fn get_list(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TaskList>, AppError> {
    state
        .repo
        .get_list(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("List {} not found", id)))
}

/// POST /api/lists - Create a new list.
pub async fn create_list(
    State(state): State<AppState>,
    AppJson(request): AppJson<ListRequest>,
) -> Result<Response, AppError> {
    let request = request.normalized();
    request.validate()?;

    let list = state.repo.create_list(&request).await?;
    Ok(created(format!("/api/lists/{}", list.id), list))
}

/// PUT /api/lists/:id - Replace a list.
pub async fn update_list(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(request): AppJson<ListRequest>,
) -> Result<StatusCode, AppError> {
    ensure_same_id(&id, request.id.as_deref())?;
    let request = request.normalized();
    request.validate()?;

    state.repo.update_list(&id, &request).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/lists/:id - Delete a list and the tasks on it.
pub async fn delete_list(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.repo.delete_list(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
