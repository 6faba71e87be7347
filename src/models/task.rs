//! Task model matching the frontend Task interface.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use super::{non_blank, DueDate, DueInput};
use crate::errors::AppError;

pub const MAX_TITLE_LEN: usize = 500;

/// A single to-do item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DueDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// UI hint only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtasks: Option<i32>,
}

/// Request body for creating or fully replacing a task.
///
/// `id` is ignored on create and must match the path on replace. The due
/// date is only usable after [`TaskRequest::normalized`] has placed it on
/// the calendar.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, rename = "dueDate")]
    pub due_input: Option<DueInput>,
    #[serde(skip)]
    pub due_date: Option<DueDate>,
    #[serde(default)]
    pub list_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub subtasks: Option<i32>,
}

impl TaskRequest {
    /// Trim the title, turn blank references into `None` and read the due
    /// date on the calendar at `offset`.
    pub fn normalized(mut self, offset: &FixedOffset) -> Self {
        self.title = self.title.trim().to_string();
        self.due_date = self.due_input.map(|due| due.on_calendar(offset));
        self.list_id = non_blank(self.list_id);
        self.user_id = non_blank(self.user_id);
        self.section = non_blank(self.section);
        self
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("Title is required".to_string()));
        }
        if self.title.chars().count() > MAX_TITLE_LEN {
            return Err(AppError::Validation(format!(
                "Title must be at most {} characters",
                MAX_TITLE_LEN
            )));
        }
        if matches!(self.subtasks, Some(n) if n < 0) {
            return Err(AppError::Validation(
                "Subtask count cannot be negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_due_date_read_on_calendar() {
        let request: TaskRequest = serde_json::from_str(
            r#"{"title":"  Call home ","dueDate":"2026-10-20T02:00:00.000Z","listId":" "}"#,
        )
        .unwrap();
        let request = request.normalized(&FixedOffset::west_opt(5 * 3600).unwrap());

        assert_eq!(request.title, "Call home");
        assert_eq!(request.list_id, None);
        assert_eq!(
            request.due_date.map(|d| d.to_string()).as_deref(),
            Some("2026-10-19T21:00:00")
        );
    }
}
