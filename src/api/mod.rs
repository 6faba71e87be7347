//! REST API module.
//!
//! Contains all API routes and handlers following the frontend contract.
//! Success bodies are bare JSON; creates answer 201 with a `Location`
//! header, replaces and deletes answer 204.

mod lists;
mod notes;
mod tags;
mod tasks;
mod users;

pub use lists::*;
pub use notes::*;
pub use tags::*;
pub use tasks::*;
pub use users::*;

use axum::{
    extract::FromRequest,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// JSON body extractor whose rejections use the API error body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// `?userId=` on collection reads.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerQuery {
    pub user_id: Option<String>,
}

impl OwnerQuery {
    pub fn owner(&self) -> Option<&str> {
        self.user_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// 201 Created with the new resource's location and body.
pub fn created<T: Serialize>(location: String, body: T) -> Response {
    (StatusCode::CREATED, [(header::LOCATION, location)], Json(body)).into_response()
}

/// A replace body must name the record it replaces.
pub fn ensure_same_id(path_id: &str, body_id: Option<&str>) -> Result<(), AppError> {
    match body_id {
        Some(body_id) if body_id == path_id => Ok(()),
        Some(body_id) => Err(AppError::BadRequest(format!(
            "Id in body ({}) does not match id in URL ({})",
            body_id, path_id
        ))),
        None => Err(AppError::BadRequest(format!(
            "Id in body is required and must match id in URL ({})",
            path_id
        ))),
    }
}
