//! Sticky note API endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};

use super::{created, ensure_same_id, AppJson, OwnerQuery};
use crate::errors::AppError;
use crate::models::{Note, NoteRequest};
use crate::AppState;

/// GET /api/notes - List notes, newest first.
pub async fn list_notes(
    State(state): State<AppState>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<Vec<Note>>, AppError> {
    Ok(Json(state.repo.list_notes(query.owner()).await?))
}

pub async fn get_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Note>, AppError> {
    state
        .repo
        .get_note(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Note {} not found", id)))
}

pub async fn create_note(
    State(state): State<AppState>,
    AppJson(request): AppJson<NoteRequest>,
) -> Result<Response, AppError> {
    let request = request.normalized();
    request.validate()?;

    let note = state.repo.create_note(&request).await?;
    Ok(created(format!("/api/notes/{}", note.id), note))
}

pub async fn update_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(request): AppJson<NoteRequest>,
) -> Result<StatusCode, AppError> {
    ensure_same_id(&id, request.id.as_deref())?;
    let request = request.normalized();
    request.validate()?;

    state.repo.update_note(&id, &request).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.repo.delete_note(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
