//! Task API endpoints, including the classified views.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{created, ensure_same_id, AppJson, OwnerQuery};
use crate::classify::{
    self, BucketGroup, BucketSummary, DateGroup, Granularity, SortKey, TaskFilter, TaskQuery,
};
use crate::config::Config;
use crate::errors::AppError;
use crate::models::{DueDate, DueInput, Task, TaskList, TaskRequest};
use crate::AppState;

/// Query string shared by the classified views.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskViewQuery {
    pub user_id: Option<String>,
    #[serde(default)]
    pub show_completed: bool,
    pub list_id: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    /// Reference time override, `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM[:SS]` or RFC 3339
    pub now: Option<String>,
    /// `flat` folds every future day into a single upcoming bucket
    pub granularity: Option<String>,
}

impl TaskViewQuery {
    fn owner(&self) -> Option<&str> {
        self.user_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    fn reference_time(&self, config: &Config) -> Result<NaiveDateTime, AppError> {
        match self.now.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => raw
                .parse::<DueInput>()
                .map(|d| d.on_calendar(&config.utc_offset).as_datetime())
                .map_err(|e| AppError::Validation(format!("Invalid now parameter: {}", e))),
            None => Ok(config.local_now()),
        }
    }

    fn granularity(&self) -> Granularity {
        match self.granularity.as_deref() {
            Some(g) if g.eq_ignore_ascii_case("flat") => Granularity::Flat,
            _ => Granularity::Detailed,
        }
    }

    fn task_query(&self, filter: TaskFilter) -> TaskQuery {
        TaskQuery {
            filter,
            show_completed: self.show_completed,
            list_id: self.list_id.clone().filter(|s| !s.trim().is_empty()),
            search: self.search.clone(),
            sort: self.sort.as_deref().map(SortKey::parse).unwrap_or_default(),
        }
    }
}

/// Tasks and lists in the caller's scope.
async fn load_scope(
    state: &AppState,
    owner: Option<&str>,
) -> Result<(Vec<Task>, Vec<TaskList>), AppError> {
    let tasks = state.repo.list_tasks(owner).await?;
    let lists = state.repo.list_lists(owner).await?;
    Ok((tasks, lists))
}

/// GET /api/tasks - List tasks without classification.
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<Vec<Task>>, AppError> {
    Ok(Json(state.repo.list_tasks(query.owner()).await?))
}

/// GET /api/tasks/:id - Get a single task.
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Task>, AppError> {
    state
        .repo
        .get_task(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Task {} not found", id)))
}

/// GET /api/tasks/filter/:name - Tasks matching a named filter.
///
/// Unknown names are not an error; they return the unfiltered view.
pub async fn filter_tasks(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<TaskViewQuery>,
) -> Result<Json<Vec<Task>>, AppError> {
    let now = query.reference_time(&state.config)?;
    let filter = TaskFilter::parse(&name);
    if filter == TaskFilter::All && !name.eq_ignore_ascii_case("all") {
        tracing::debug!(filter = %name, "Unknown task filter, returning all tasks");
    }

    let (tasks, lists) = load_scope(&state, query.owner()).await?;
    Ok(Json(classify::select(
        &tasks,
        &query.task_query(filter),
        now,
        &lists,
    )))
}

/// GET /api/tasks/buckets - Tasks grouped by bucket.
pub async fn task_buckets(
    State(state): State<AppState>,
    Query(query): Query<TaskViewQuery>,
) -> Result<Json<Vec<BucketGroup>>, AppError> {
    let now = query.reference_time(&state.config)?;
    let (tasks, lists) = load_scope(&state, query.owner()).await?;
    Ok(Json(classify::group_by_bucket(
        &tasks,
        &query.task_query(TaskFilter::All),
        now,
        &lists,
        query.granularity(),
    )))
}

/// GET /api/tasks/agenda - Upcoming tasks grouped by day.
pub async fn task_agenda(
    State(state): State<AppState>,
    Query(query): Query<TaskViewQuery>,
) -> Result<Json<Vec<DateGroup>>, AppError> {
    let now = query.reference_time(&state.config)?;
    let (tasks, lists) = load_scope(&state, query.owner()).await?;
    Ok(Json(classify::group_by_date(
        &tasks,
        &query.task_query(TaskFilter::All),
        now,
        &lists,
    )))
}

/// GET /api/tasks/summary - Pending task counts per bucket.
pub async fn task_summary(
    State(state): State<AppState>,
    Query(query): Query<TaskViewQuery>,
) -> Result<Json<BucketSummary>, AppError> {
    let now = query.reference_time(&state.config)?;
    let tasks = state.repo.list_tasks(query.owner()).await?;
    Ok(Json(classify::summarize(&tasks, now)))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleResponse {
    pub rescheduled: u64,
    pub due_date: DueDate,
}

/// POST /api/tasks/reschedule-overdue - Move every overdue task to tomorrow.
pub async fn reschedule_overdue(
    State(state): State<AppState>,
    Query(query): Query<TaskViewQuery>,
) -> Result<Json<RescheduleResponse>, AppError> {
    let now = query.reference_time(&state.config)?;
    let tasks = state.repo.list_tasks(query.owner()).await?;
    let plan = classify::plan_reschedule_overdue(&tasks, now);

    let rescheduled = state
        .repo
        .reschedule_tasks(&plan.task_ids, plan.due_date)
        .await?;
    tracing::info!(rescheduled, due = %plan.due_date, "Rescheduled overdue tasks");

    Ok(Json(RescheduleResponse {
        rescheduled,
        due_date: plan.due_date,
    }))
}

/// POST /api/tasks - Create a new task.
pub async fn create_task(
    State(state): State<AppState>,
    AppJson(request): AppJson<TaskRequest>,
) -> Result<Response, AppError> {
    let request = request.normalized(&state.config.utc_offset);
    request.validate()?;

    let task = state.repo.create_task(&request).await?;
    Ok(created(format!("/api/tasks/{}", task.id), task))
}

/// PUT /api/tasks/:id - Replace a task.
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(request): AppJson<TaskRequest>,
) -> Result<StatusCode, AppError> {
    ensure_same_id(&id, request.id.as_deref())?;
    let request = request.normalized(&state.config.utc_offset);
    request.validate()?;

    state.repo.update_task(&id, &request).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/tasks/:id/toggle - Flip completion.
pub async fn toggle_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.repo.toggle_task(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/tasks/:id - Delete a task.
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.repo.delete_task(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
