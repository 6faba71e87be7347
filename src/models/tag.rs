//! Tag model matching the frontend Tag interface.

use serde::{Deserialize, Serialize};

use super::non_blank;
use crate::errors::AppError;

pub const MAX_TAG_NAME_LEN: usize = 50;

/// The two tags every user starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultTag {
    Tag1,
    Tag2,
}

impl DefaultTag {
    pub const ALL: [DefaultTag; 2] = [DefaultTag::Tag1, DefaultTag::Tag2];

    /// Stable key, also the id of the global template row.
    pub fn key(self) -> &'static str {
        match self {
            DefaultTag::Tag1 => "tag1",
            DefaultTag::Tag2 => "tag2",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }

    pub fn name(self) -> &'static str {
        match self {
            DefaultTag::Tag1 => "Tag 1",
            DefaultTag::Tag2 => "Tag 2",
        }
    }

    pub fn id_for_user(self, user_id: &str) -> String {
        format!("{}-{}", user_id, self.key())
    }
}

/// A label for tasks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_kind: Option<DefaultTag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
}

impl Tag {
    pub fn is_default(&self) -> bool {
        self.default_kind.is_some()
    }
}

/// Request body for creating or fully replacing a tag.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl TagRequest {
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.user_id = non_blank(self.user_id);
        self
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.is_empty() {
            return Err(AppError::Validation("Tag name is required".to_string()));
        }
        if self.name.chars().count() > MAX_TAG_NAME_LEN {
            return Err(AppError::Validation(format!(
                "Tag name must be at most {} characters",
                MAX_TAG_NAME_LEN
            )));
        }
        Ok(())
    }
}
