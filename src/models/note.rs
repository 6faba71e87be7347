//! Sticky note model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{is_hex_color, non_blank};
use crate::errors::AppError;

pub const DEFAULT_NOTE_COLOR: &str = "#FFD433";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Request body for creating or fully replacing a note.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl NoteRequest {
    pub fn normalized(mut self) -> Self {
        self.color = non_blank(self.color);
        self.user_id = non_blank(self.user_id);
        self
    }

    pub fn validate(&self) -> Result<(), AppError> {
        match &self.color {
            Some(color) if !is_hex_color(color) => Err(AppError::Validation(format!(
                "Color must look like #RRGGBB, got {}",
                color
            ))),
            _ => Ok(()),
        }
    }

    pub fn color_or_default(&self) -> String {
        self.color
            .clone()
            .unwrap_or_else(|| DEFAULT_NOTE_COLOR.to_string())
    }
}
