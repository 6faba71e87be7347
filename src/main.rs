//! Task Manager Backend
//!
//! REST backend for lists, tasks, tags, notes and accounts, with SQLite
//! persistence and a shared date-classification engine.

mod api;
mod auth;
mod classify;
mod config;
mod db;
mod errors;
mod models;
mod ownership;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Task Manager Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);
    tracing::info!("Calendar offset: {}", config.utc_offset);

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    repo.seed_global_templates().await?;
    tracing::info!("Global template lists and tags ready");

    let state = AppState {
        repo,
        config: Arc::new(config.clone()),
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// CORS policy from the configured origins. A `*` entry allows any origin.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .expose_headers([header::LOCATION])
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    let api_routes = Router::new()
        // Tasks
        .route("/tasks", get(api::list_tasks).post(api::create_task))
        .route("/tasks/filter/{name}", get(api::filter_tasks))
        .route("/tasks/buckets", get(api::task_buckets))
        .route("/tasks/agenda", get(api::task_agenda))
        .route("/tasks/summary", get(api::task_summary))
        .route("/tasks/reschedule-overdue", post(api::reschedule_overdue))
        .route(
            "/tasks/{id}",
            get(api::get_task)
                .put(api::update_task)
                .delete(api::delete_task),
        )
        .route("/tasks/{id}/toggle", patch(api::toggle_task))
        // Lists
        .route("/lists", get(api::list_lists).post(api::create_list))
        .route(
            "/lists/{id}",
            get(api::get_list)
                .put(api::update_list)
                .delete(api::delete_list),
        )
        // Tags
        .route("/tags", get(api::list_tags).post(api::create_tag))
        .route(
            "/tags/{id}",
            get(api::get_tag).put(api::update_tag).delete(api::delete_tag),
        )
        // Notes
        .route("/notes", get(api::list_notes).post(api::create_note))
        .route(
            "/notes/{id}",
            get(api::get_note)
                .put(api::update_note)
                .delete(api::delete_note),
        )
        // Users
        .route("/users/register", post(api::register))
        .route("/users/login", post(api::login))
        .route("/users/google-auth", post(api::google_auth))
        .route("/users/reset-password", post(api::reset_password))
        .route(
            "/users/{id}",
            get(api::get_user)
                .put(api::update_user)
                .delete(api::delete_user),
        )
        .route("/users/{id}/change-password", post(api::change_password))
        .route("/users/{id}/seed-defaults", post(api::seed_defaults))
        .route("/users/{id}/reset", post(api::reset_user_data))
        // Health
        .route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now(),
    }))
}
