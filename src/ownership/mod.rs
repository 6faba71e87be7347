//! Default data ownership.
//!
//! Builds the default rows every account starts with and performs the full
//! data reset. The reset deletes concurrently and never reports partial
//! failure to the caller; it always hands back the defaults-only state.

use std::collections::HashSet;
use std::future::Future;

use serde::Serialize;
use tokio::task::JoinSet;

use crate::errors::AppError;
use crate::models::{DefaultList, DefaultTag, Note, Tag, Task, TaskList};

/// Ownerless template lists seeded at startup.
pub fn template_lists() -> Vec<TaskList> {
    DefaultList::ALL
        .into_iter()
        .map(|kind| TaskList {
            id: kind.key().to_string(),
            name: kind.name().to_string(),
            color: kind.color().to_string(),
            user_id: None,
            default_kind: Some(kind),
            template_id: None,
        })
        .collect()
}

/// Ownerless template tags seeded at startup.
pub fn template_tags() -> Vec<Tag> {
    DefaultTag::ALL
        .into_iter()
        .map(|kind| Tag {
            id: kind.key().to_string(),
            name: kind.name().to_string(),
            user_id: None,
            default_kind: Some(kind),
            template_id: None,
        })
        .collect()
}

pub fn user_default_lists(user_id: &str) -> Vec<TaskList> {
    DefaultList::ALL
        .into_iter()
        .map(|kind| TaskList {
            id: kind.id_for_user(user_id),
            name: kind.name().to_string(),
            color: kind.color().to_string(),
            user_id: Some(user_id.to_string()),
            default_kind: Some(kind),
            template_id: Some(kind.key().to_string()),
        })
        .collect()
}

pub fn user_default_tags(user_id: &str) -> Vec<Tag> {
    DefaultTag::ALL
        .into_iter()
        .map(|kind| Tag {
            id: kind.id_for_user(user_id),
            name: kind.name().to_string(),
            user_id: Some(user_id.to_string()),
            default_kind: Some(kind),
            template_id: Some(kind.key().to_string()),
        })
        .collect()
}

/// Everything a user owns.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub tasks: Vec<Task>,
    pub lists: Vec<TaskList>,
    pub tags: Vec<Tag>,
    pub notes: Vec<Note>,
}

impl UserData {
    /// Rows a full reset removes: all tasks and notes, and every non-default list and tag.
    ///
    /// Tasks on a removed list go with the list, so they get no target of
    /// their own.
    pub fn reset_targets(&self) -> Vec<ResetTarget> {
        let removed_lists: HashSet<&str> = self
            .lists
            .iter()
            .filter(|l| !l.is_default())
            .map(|l| l.id.as_str())
            .collect();

        let tasks = self
            .tasks
            .iter()
            .filter(|t| {
                !t.list_id
                    .as_deref()
                    .is_some_and(|list_id| removed_lists.contains(list_id))
            })
            .map(|t| ResetTarget::Task(t.id.clone()));
        let notes = self.notes.iter().map(|n| ResetTarget::Note(n.id.clone()));
        let lists = removed_lists
            .iter()
            .map(|id| ResetTarget::List(id.to_string()));
        let tags = self
            .tags
            .iter()
            .filter(|t| !t.is_default())
            .map(|t| ResetTarget::Tag(t.id.clone()));

        tasks.chain(notes).chain(lists).chain(tags).collect()
    }

    /// The defaults-only state after a reset.
    ///
    /// Surviving default rows are reported as stored, so a renamed default
    /// list keeps its name; missing ones are reported as freshly seeded.
    pub fn defaults_only(&self, user_id: &str) -> UserData {
        let lists = user_default_lists(user_id)
            .into_iter()
            .map(|seeded| {
                self.lists
                    .iter()
                    .find(|l| l.default_kind == seeded.default_kind)
                    .cloned()
                    .unwrap_or(seeded)
            })
            .collect();
        let tags = user_default_tags(user_id)
            .into_iter()
            .map(|seeded| {
                self.tags
                    .iter()
                    .find(|t| t.default_kind == seeded.default_kind)
                    .cloned()
                    .unwrap_or(seeded)
            })
            .collect();

        UserData {
            tasks: Vec::new(),
            lists,
            tags,
            notes: Vec::new(),
        }
    }
}

/// A single row removed by a reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetTarget {
    Task(String),
    Note(String),
    List(String),
    Tag(String),
}

/// Storage operations the reset needs.
pub trait ResetStore: Clone + Send + Sync + 'static {
    /// Rows owned by the user. Templates are not included.
    fn load_user_data(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<UserData, AppError>> + Send;

    fn remove(&self, target: &ResetTarget) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Insert any missing default rows; existing ids are skipped.
    fn seed_defaults(&self, user_id: &str) -> impl Future<Output = Result<(), AppError>> + Send;
}

/// Delete everything the user owns except their default lists and tags.
///
/// One spawned task per row. Individual failures are logged and dropped.
pub async fn reset_user_data<S: ResetStore>(
    store: &S,
    user_id: &str,
) -> Result<UserData, AppError> {
    let current = store.load_user_data(user_id).await?;
    let targets = current.reset_targets();
    let total = targets.len();

    let mut deletes = JoinSet::new();
    for target in targets {
        let store = store.clone();
        deletes.spawn(async move {
            let result = store.remove(&target).await;
            (target, result)
        });
    }

    let mut failed = 0usize;
    while let Some(joined) = deletes.join_next().await {
        match joined {
            Ok((_, Ok(()))) => {}
            Ok((target, Err(e))) => {
                failed += 1;
                tracing::warn!(?target, "Reset could not delete row: {}", e);
            }
            Err(e) => {
                failed += 1;
                tracing::warn!("Reset delete task failed to complete: {}", e);
            }
        }
    }

    if let Err(e) = store.seed_defaults(user_id).await {
        tracing::warn!(user_id, "Re-seeding defaults after reset failed: {}", e);
    }

    tracing::info!(user_id, total, failed, "User data reset");
    Ok(current.defaults_only(user_id))
}
