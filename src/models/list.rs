//! List model matching the frontend List interface.

use serde::{Deserialize, Serialize};

use super::non_blank;
use crate::errors::AppError;

pub const MAX_LIST_NAME_LEN: usize = 100;
pub const DEFAULT_LIST_COLOR: &str = "#6366f1";

/// The three lists every user starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultList {
    Personal,
    Work,
    List1,
}

impl DefaultList {
    pub const ALL: [DefaultList; 3] = [DefaultList::Personal, DefaultList::Work, DefaultList::List1];

    /// Stable key, also the id of the global template row.
    pub fn key(self) -> &'static str {
        match self {
            DefaultList::Personal => "personal",
            DefaultList::Work => "work",
            DefaultList::List1 => "list1",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }

    pub fn name(self) -> &'static str {
        match self {
            DefaultList::Personal => "Personal",
            DefaultList::Work => "Work",
            DefaultList::List1 => "List 1",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            DefaultList::Personal => "#FF6B6B",
            DefaultList::Work => "#4ECDC4",
            DefaultList::List1 => "#FFD166",
        }
    }

    /// Id of the user's own copy, e.g. `<userId>-work`.
    pub fn id_for_user(self, user_id: &str) -> String {
        format!("{}-{}", user_id, self.key())
    }
}

/// A named, colored grouping of tasks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskList {
    pub id: String,
    pub name: String,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Set only on default rows; managed by the server
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_kind: Option<DefaultList>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
}

impl TaskList {
    pub fn is_default(&self) -> bool {
        self.default_kind.is_some()
    }
}

/// Request body for creating or fully replacing a list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl ListRequest {
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.color = non_blank(self.color);
        self.user_id = non_blank(self.user_id);
        self
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.is_empty() {
            return Err(AppError::Validation("List name is required".to_string()));
        }
        if self.name.chars().count() > MAX_LIST_NAME_LEN {
            return Err(AppError::Validation(format!(
                "List name must be at most {} characters",
                MAX_LIST_NAME_LEN
            )));
        }
        if let Some(color) = &self.color {
            if !is_hex_color(color) {
                return Err(AppError::Validation(format!(
                    "Color must look like #RRGGBB, got {}",
                    color
                )));
            }
        }
        Ok(())
    }

    pub fn color_or_default(&self) -> String {
        self.color
            .clone()
            .unwrap_or_else(|| DEFAULT_LIST_COLOR.to_string())
    }
}

/// `#` followed by exactly six hex digits.
pub fn is_hex_color(s: &str) -> bool {
    s.len() == 7
        && s.starts_with('#')
        && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color() {
        assert!(is_hex_color("#FF6B6B"));
        assert!(is_hex_color("#6366f1"));
        assert!(!is_hex_color("FF6B6B"));
        assert!(!is_hex_color("#FF6B6"));
        assert!(!is_hex_color("#GG6B6B"));
    }

    #[test]
    fn test_default_list_ids() {
        assert_eq!(DefaultList::Work.id_for_user("u1"), "u1-work");
        assert_eq!(DefaultList::from_key("list1"), Some(DefaultList::List1));
        assert_eq!(DefaultList::from_key("List1"), None);
        assert_eq!(
            serde_json::to_string(&DefaultList::List1).unwrap(),
            "\"list1\""
        );
    }

    #[test]
    fn test_name_length_limit() {
        let request = ListRequest {
            id: None,
            name: "x".repeat(MAX_LIST_NAME_LEN + 1),
            color: None,
            user_id: None,
        };
        assert!(request.validate().is_err());
    }
}
