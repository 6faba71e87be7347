//! Database repository for CRUD operations.
//!
//! Uses prepared statements and transactions for data integrity. Collection
//! reads take an optional owner; `None` returns every row.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqliteConnection, SqlitePool};

use crate::errors::AppError;
use crate::models::{
    DefaultList, DefaultTag, DueDate, ListRequest, Note, NoteRequest, Tag, TagRequest, Task,
    TaskList, TaskRequest, User,
};
use crate::ownership::{
    template_lists, template_tags, user_default_lists, user_default_tags, ResetStore,
    ResetTarget, UserData,
};

const TASK_COLUMNS: &str =
    "id, title, description, completed, created_at, due_date, list_id, user_id, section, subtasks";
const LIST_COLUMNS: &str = "id, name, color, user_id, default_kind, template_id";
const TAG_COLUMNS: &str = "id, name, user_id, default_kind, template_id";
const NOTE_COLUMNS: &str = "id, title, content, color, created_at, updated_at, user_id";
const USER_COLUMNS: &str = "id, name, email, password_hash, google_id, profile_picture_url, created_at, last_login_at, is_email_verified, has_password, has_google_login";

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Turn a zero-row update into the right error.
    ///
    /// Missing row means not found; a row that exists but was not updated is
    /// an unexpected failure.
    async fn recheck_update(
        &self,
        table: &'static str,
        label: &str,
        id: &str,
        rows_affected: u64,
    ) -> Result<(), AppError> {
        if rows_affected > 0 {
            return Ok(());
        }
        let exists = sqlx::query(&format!("SELECT 1 FROM {} WHERE id = ?", table))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .is_some();
        if exists {
            tracing::error!(table, id, "Update affected no rows although the row exists");
            Err(AppError::Internal(format!("{} {} could not be updated", label, id)))
        } else {
            Err(AppError::NotFound(format!("{} {} not found", label, id)))
        }
    }

    // ==================== TASK OPERATIONS ====================

    /// List tasks, oldest first.
    pub async fn list_tasks(&self, owner: Option<&str>) -> Result<Vec<Task>, AppError> {
        let rows = match owner {
            Some(user_id) => {
                sqlx::query(&format!(
                    "SELECT {} FROM tasks WHERE user_id = ? ORDER BY created_at",
                    TASK_COLUMNS
                ))
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(&format!("SELECT {} FROM tasks ORDER BY created_at", TASK_COLUMNS))
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(rows.iter().map(task_from_row).collect())
    }

    pub async fn get_task(&self, id: &str) -> Result<Option<Task>, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM tasks WHERE id = ?", TASK_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(task_from_row))
    }

    /// A task's list must exist and be global or belong to the task's owner.
    async fn check_task_list(
        &self,
        list_id: Option<&str>,
        user_id: Option<&str>,
    ) -> Result<(), AppError> {
        let Some(list_id) = list_id else {
            return Ok(());
        };
        let list = self
            .get_list(list_id)
            .await?
            .ok_or_else(|| AppError::Validation(format!("List {} does not exist", list_id)))?;

        match list.user_id.as_deref() {
            Some(owner) if Some(owner) != user_id => Err(AppError::Validation(format!(
                "List {} belongs to another user",
                list_id
            ))),
            _ => Ok(()),
        }
    }

    pub async fn create_task(&self, request: &TaskRequest) -> Result<Task, AppError> {
        self.check_task_list(request.list_id.as_deref(), request.user_id.as_deref())
            .await?;

        let task = Task {
            id: uuid::Uuid::new_v4().to_string(),
            title: request.title.clone(),
            description: request.description.clone(),
            completed: request.completed,
            created_at: Utc::now(),
            due_date: request.due_date,
            list_id: request.list_id.clone(),
            user_id: request.user_id.clone(),
            section: request.section.clone(),
            subtasks: request.subtasks,
        };

        sqlx::query(
            "INSERT INTO tasks (id, title, description, completed, created_at, due_date, list_id, user_id, section, subtasks) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.completed as i32)
        .bind(task.created_at)
        .bind(task.due_date.map(|d| d.to_string()))
        .bind(&task.list_id)
        .bind(&task.user_id)
        .bind(&task.section)
        .bind(task.subtasks)
        .execute(&self.pool)
        .await?;

        tracing::debug!(task_id = %task.id, "Created task");
        Ok(task)
    }

    /// Replace every client-editable field. `created_at` is kept.
    pub async fn update_task(&self, id: &str, request: &TaskRequest) -> Result<(), AppError> {
        self.check_task_list(request.list_id.as_deref(), request.user_id.as_deref())
            .await?;

        let result = sqlx::query(
            "UPDATE tasks SET title = ?, description = ?, completed = ?, due_date = ?, list_id = ?, user_id = ?, section = ?, subtasks = ? WHERE id = ?"
        )
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.completed as i32)
        .bind(request.due_date.map(|d| d.to_string()))
        .bind(&request.list_id)
        .bind(&request.user_id)
        .bind(&request.section)
        .bind(request.subtasks)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.recheck_update("tasks", "Task", id, result.rows_affected())
            .await
    }

    /// Flip the completion flag.
    pub async fn toggle_task(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE tasks SET completed = 1 - completed WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Task {} not found", id)));
        }
        Ok(())
    }

    pub async fn delete_task(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Task {} not found", id)));
        }
        Ok(())
    }

    /// Set the due date of many tasks at once; returns how many rows changed.
    pub async fn reschedule_tasks(&self, ids: &[String], due: DueDate) -> Result<u64, AppError> {
        let due = due.to_string();
        let mut changed = 0;

        let mut tx = self.pool.begin().await?;
        for id in ids {
            changed += sqlx::query("UPDATE tasks SET due_date = ? WHERE id = ?")
                .bind(&due)
                .bind(id)
                .execute(&mut *tx)
                .await?
                .rows_affected();
        }
        tx.commit().await?;

        Ok(changed)
    }

    // ==================== LIST OPERATIONS ====================

    /// List lists. With an owner, their own lists plus the global templates.
    pub async fn list_lists(&self, owner: Option<&str>) -> Result<Vec<TaskList>, AppError> {
        let rows = match owner {
            Some(user_id) => {
                sqlx::query(&format!(
                    "SELECT {} FROM lists WHERE user_id = ? OR user_id IS NULL ORDER BY rowid",
                    LIST_COLUMNS
                ))
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(&format!("SELECT {} FROM lists ORDER BY rowid", LIST_COLUMNS))
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(rows.iter().map(list_from_row).collect())
    }

    pub async fn get_list(&self, id: &str) -> Result<Option<TaskList>, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM lists WHERE id = ?", LIST_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(list_from_row))
    }

    pub async fn create_list(&self, request: &ListRequest) -> Result<TaskList, AppError> {
        let list = TaskList {
            id: uuid::Uuid::new_v4().to_string(),
            name: request.name.clone(),
            color: request.color_or_default(),
            user_id: request.user_id.clone(),
            default_kind: None,
            template_id: None,
        };

        sqlx::query("INSERT INTO lists (id, name, color, user_id) VALUES (?, ?, ?, ?)")
            .bind(&list.id)
            .bind(&list.name)
            .bind(&list.color)
            .bind(&list.user_id)
            .execute(&self.pool)
            .await?;

        Ok(list)
    }

    /// Replace name, color and owner. Default markers are left alone.
    ///
    /// A default list keeps its owner. Any other list may only move to an
    /// owner that already owns every task on it; making it global is always
    /// allowed.
    pub async fn update_list(&self, id: &str, request: &ListRequest) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query(&format!("SELECT {} FROM lists WHERE id = ?", LIST_COLUMNS))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .map(|row| list_from_row(&row))
            .ok_or_else(|| AppError::NotFound(format!("List {} not found", id)))?;

        if current.user_id != request.user_id {
            if current.is_default() {
                return Err(AppError::Validation(format!(
                    "Default list {} cannot change owner",
                    id
                )));
            }
            if let Some(owner) = request.user_id.as_deref() {
                let foreign_tasks: i64 = sqlx::query_scalar(
                    "SELECT COUNT(*) FROM tasks WHERE list_id = ? AND (user_id IS NULL OR user_id <> ?)",
                )
                .bind(id)
                .bind(owner)
                .fetch_one(&mut *tx)
                .await?;
                if foreign_tasks > 0 {
                    return Err(AppError::Validation(format!(
                        "List {} still holds {} task(s) of another owner",
                        id, foreign_tasks
                    )));
                }
            }
        }

        sqlx::query("UPDATE lists SET name = ?, color = ?, user_id = ? WHERE id = ?")
            .bind(&request.name)
            .bind(request.color_or_default())
            .bind(&request.user_id)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Delete a list together with the tasks on it.
    pub async fn delete_list(&self, id: &str) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let removed_tasks = sqlx::query("DELETE FROM tasks WHERE list_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let result = sqlx::query("DELETE FROM lists WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("List {} not found", id)));
        }

        tx.commit().await?;
        tracing::debug!(list_id = id, removed_tasks, "Deleted list");
        Ok(())
    }

    // ==================== TAG OPERATIONS ====================

    /// List tags. With an owner, their own tags plus the global templates.
    pub async fn list_tags(&self, owner: Option<&str>) -> Result<Vec<Tag>, AppError> {
        let rows = match owner {
            Some(user_id) => {
                sqlx::query(&format!(
                    "SELECT {} FROM tags WHERE user_id = ? OR user_id IS NULL ORDER BY rowid",
                    TAG_COLUMNS
                ))
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(&format!("SELECT {} FROM tags ORDER BY rowid", TAG_COLUMNS))
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(rows.iter().map(tag_from_row).collect())
    }

    pub async fn get_tag(&self, id: &str) -> Result<Option<Tag>, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM tags WHERE id = ?", TAG_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(tag_from_row))
    }

    pub async fn create_tag(&self, request: &TagRequest) -> Result<Tag, AppError> {
        let tag = Tag {
            id: uuid::Uuid::new_v4().to_string(),
            name: request.name.clone(),
            user_id: request.user_id.clone(),
            default_kind: None,
            template_id: None,
        };

        sqlx::query("INSERT INTO tags (id, name, user_id) VALUES (?, ?, ?)")
            .bind(&tag.id)
            .bind(&tag.name)
            .bind(&tag.user_id)
            .execute(&self.pool)
            .await?;

        Ok(tag)
    }

    pub async fn update_tag(&self, id: &str, request: &TagRequest) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE tags SET name = ?, user_id = ? WHERE id = ?")
            .bind(&request.name)
            .bind(&request.user_id)
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.recheck_update("tags", "Tag", id, result.rows_affected())
            .await
    }

    pub async fn delete_tag(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM tags WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Tag {} not found", id)));
        }
        Ok(())
    }

    // ==================== NOTE OPERATIONS ====================

    /// List notes, newest first.
    pub async fn list_notes(&self, owner: Option<&str>) -> Result<Vec<Note>, AppError> {
        let rows = match owner {
            Some(user_id) => {
                sqlx::query(&format!(
                    "SELECT {} FROM notes WHERE user_id = ? ORDER BY created_at DESC",
                    NOTE_COLUMNS
                ))
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(&format!(
                    "SELECT {} FROM notes ORDER BY created_at DESC",
                    NOTE_COLUMNS
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.iter().map(note_from_row).collect())
    }

    pub async fn get_note(&self, id: &str) -> Result<Option<Note>, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM notes WHERE id = ?", NOTE_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(note_from_row))
    }

    pub async fn create_note(&self, request: &NoteRequest) -> Result<Note, AppError> {
        let note = Note {
            id: uuid::Uuid::new_v4().to_string(),
            title: request.title.clone(),
            content: request.content.clone(),
            color: request.color_or_default(),
            created_at: Utc::now(),
            updated_at: None,
            user_id: request.user_id.clone(),
        };

        sqlx::query(
            "INSERT INTO notes (id, title, content, color, created_at, user_id) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&note.id)
        .bind(&note.title)
        .bind(&note.content)
        .bind(&note.color)
        .bind(note.created_at)
        .bind(&note.user_id)
        .execute(&self.pool)
        .await?;

        Ok(note)
    }

    /// Replace the note and stamp `updated_at`.
    pub async fn update_note(&self, id: &str, request: &NoteRequest) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE notes SET title = ?, content = ?, color = ?, user_id = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&request.title)
        .bind(&request.content)
        .bind(request.color_or_default())
        .bind(&request.user_id)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.recheck_update("notes", "Note", id, result.rows_affected())
            .await
    }

    pub async fn delete_note(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM notes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Note {} not found", id)));
        }
        Ok(())
    }

    // ==================== DEFAULT DATA ====================

    /// Insert the ownerless template lists and tags if they are missing.
    pub async fn seed_global_templates(&self) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        for list in template_lists() {
            insert_list_if_missing(&mut *tx, &list).await?;
        }
        for tag in template_tags() {
            insert_tag_if_missing(&mut *tx, &tag).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Insert the user's default lists and tags. Rows that already exist are
    /// skipped, so renamed defaults keep their names.
    pub async fn seed_user_defaults(&self, user_id: &str) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        seed_user_defaults_with(&mut *tx, user_id).await?;
        tx.commit().await?;
        Ok(())
    }

    /// The user's own default lists and tags.
    pub async fn user_defaults(&self, user_id: &str) -> Result<(Vec<TaskList>, Vec<Tag>), AppError> {
        let lists = sqlx::query(&format!(
            "SELECT {} FROM lists WHERE user_id = ? AND default_kind IS NOT NULL ORDER BY rowid",
            LIST_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        let tags = sqlx::query(&format!(
            "SELECT {} FROM tags WHERE user_id = ? AND default_kind IS NOT NULL ORDER BY rowid",
            TAG_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok((
            lists.iter().map(list_from_row).collect(),
            tags.iter().map(tag_from_row).collect(),
        ))
    }

    /// Everything the user owns, templates excluded.
    pub async fn user_data(&self, user_id: &str) -> Result<UserData, AppError> {
        let lists = sqlx::query(&format!(
            "SELECT {} FROM lists WHERE user_id = ? ORDER BY rowid",
            LIST_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        let tags = sqlx::query(&format!(
            "SELECT {} FROM tags WHERE user_id = ? ORDER BY rowid",
            TAG_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(UserData {
            tasks: self.list_tasks(Some(user_id)).await?,
            lists: lists.iter().map(list_from_row).collect(),
            tags: tags.iter().map(tag_from_row).collect(),
            notes: self.list_notes(Some(user_id)).await?,
        })
    }

    // ==================== USER OPERATIONS ====================

    pub async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    /// Look up by already-normalized email.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    pub async fn find_user_by_google_id(&self, google_id: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE google_id = ?",
            USER_COLUMNS
        ))
        .bind(google_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    /// Insert the user and their default data in one transaction.
    pub async fn create_user_with_defaults(&self, user: &User) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO users (id, name, email, password_hash, google_id, profile_picture_url, created_at, last_login_at, is_email_verified, has_password, has_google_login) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.google_id)
        .bind(&user.profile_picture_url)
        .bind(user.created_at)
        .bind(user.last_login_at)
        .bind(user.is_email_verified as i32)
        .bind(user.has_password as i32)
        .bind(user.has_google_login as i32)
        .execute(&mut *tx)
        .await?;

        seed_user_defaults_with(&mut *tx, &user.id).await?;

        tx.commit().await?;
        tracing::info!(user_id = %user.id, "Created user with default data");
        Ok(())
    }

    /// Attach an external identity; the password side is untouched.
    pub async fn link_google_identity(
        &self,
        id: &str,
        google_id: &str,
        profile_picture_url: Option<&str>,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE users SET google_id = ?, has_google_login = 1, profile_picture_url = COALESCE(?, profile_picture_url), last_login_at = ? WHERE id = ?",
        )
        .bind(google_id)
        .bind(profile_picture_url)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.recheck_update("users", "User", id, result.rows_affected())
            .await
    }

    pub async fn touch_last_login(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE users SET last_login_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.recheck_update("users", "User", id, result.rows_affected())
            .await
    }

    pub async fn update_user_profile(&self, id: &str, name: &str, email: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE users SET name = ?, email = ? WHERE id = ?")
            .bind(name)
            .bind(email)
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.recheck_update("users", "User", id, result.rows_affected())
            .await
    }

    /// Store a new password hash. Never clears the external identity.
    pub async fn set_password(&self, id: &str, password_hash: &str) -> Result<(), AppError> {
        let result =
            sqlx::query("UPDATE users SET password_hash = ?, has_password = 1 WHERE id = ?")
                .bind(password_hash)
                .bind(id)
                .execute(&self.pool)
                .await?;

        self.recheck_update("users", "User", id, result.rows_affected())
            .await
    }

    /// Delete the user; owned rows go with it through the foreign keys.
    pub async fn delete_user(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {} not found", id)));
        }
        tracing::info!(user_id = id, "Deleted user");
        Ok(())
    }
}

impl ResetStore for Repository {
    async fn load_user_data(&self, user_id: &str) -> Result<UserData, AppError> {
        self.user_data(user_id).await
    }

    async fn remove(&self, target: &ResetTarget) -> Result<(), AppError> {
        match target {
            ResetTarget::Task(id) => self.delete_task(id).await,
            ResetTarget::Note(id) => self.delete_note(id).await,
            ResetTarget::List(id) => self.delete_list(id).await,
            ResetTarget::Tag(id) => self.delete_tag(id).await,
        }
    }

    async fn seed_defaults(&self, user_id: &str) -> Result<(), AppError> {
        self.seed_user_defaults(user_id).await
    }
}

async fn seed_user_defaults_with(conn: &mut SqliteConnection, user_id: &str) -> Result<(), AppError> {
    for list in user_default_lists(user_id) {
        insert_list_if_missing(conn, &list).await?;
    }
    for tag in user_default_tags(user_id) {
        insert_tag_if_missing(conn, &tag).await?;
    }
    Ok(())
}

async fn insert_list_if_missing(conn: &mut SqliteConnection, list: &TaskList) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO lists (id, name, color, user_id, default_kind, template_id) VALUES (?, ?, ?, ?, ?, ?) ON CONFLICT(id) DO NOTHING",
    )
    .bind(&list.id)
    .bind(&list.name)
    .bind(&list.color)
    .bind(&list.user_id)
    .bind(list.default_kind.map(DefaultList::key))
    .bind(&list.template_id)
    .execute(conn)
    .await?;
    Ok(())
}

async fn insert_tag_if_missing(conn: &mut SqliteConnection, tag: &Tag) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO tags (id, name, user_id, default_kind, template_id) VALUES (?, ?, ?, ?, ?) ON CONFLICT(id) DO NOTHING",
    )
    .bind(&tag.id)
    .bind(&tag.name)
    .bind(&tag.user_id)
    .bind(tag.default_kind.map(DefaultTag::key))
    .bind(&tag.template_id)
    .execute(conn)
    .await?;
    Ok(())
}

// Helper functions for row conversion

fn task_from_row(row: &sqlx::sqlite::SqliteRow) -> Task {
    let completed: i32 = row.get("completed");
    let due_date: Option<String> = row.get("due_date");
    Task {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        completed: completed != 0,
        created_at: row.get("created_at"),
        due_date: due_date.and_then(|s| parse_due(&s)),
        list_id: row.get("list_id"),
        user_id: row.get("user_id"),
        section: row.get("section"),
        subtasks: row.get("subtasks"),
    }
}

fn parse_due(raw: &str) -> Option<DueDate> {
    match raw.parse() {
        Ok(due) => Some(due),
        Err(e) => {
            tracing::warn!("Ignoring unreadable stored due date: {}", e);
            None
        }
    }
}

fn list_from_row(row: &sqlx::sqlite::SqliteRow) -> TaskList {
    let default_kind: Option<String> = row.get("default_kind");
    TaskList {
        id: row.get("id"),
        name: row.get("name"),
        color: row.get("color"),
        user_id: row.get("user_id"),
        default_kind: default_kind.as_deref().and_then(DefaultList::from_key),
        template_id: row.get("template_id"),
    }
}

fn tag_from_row(row: &sqlx::sqlite::SqliteRow) -> Tag {
    let default_kind: Option<String> = row.get("default_kind");
    Tag {
        id: row.get("id"),
        name: row.get("name"),
        user_id: row.get("user_id"),
        default_kind: default_kind.as_deref().and_then(DefaultTag::from_key),
        template_id: row.get("template_id"),
    }
}

fn note_from_row(row: &sqlx::sqlite::SqliteRow) -> Note {
    Note {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        color: row.get("color"),
        created_at: row.get("created_at"),
        updated_at: row.get::<Option<DateTime<Utc>>, _>("updated_at"),
        user_id: row.get("user_id"),
    }
}

fn user_from_row(row: &sqlx::sqlite::SqliteRow) -> User {
    let is_email_verified: i32 = row.get("is_email_verified");
    let has_password: i32 = row.get("has_password");
    let has_google_login: i32 = row.get("has_google_login");
    User {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        google_id: row.get("google_id"),
        profile_picture_url: row.get("profile_picture_url"),
        created_at: row.get("created_at"),
        last_login_at: row.get("last_login_at"),
        is_email_verified: is_email_verified != 0,
        has_password: has_password != 0,
        has_google_login: has_google_login != 0,
    }
}
