//! Account endpoints: registration, login, external-identity linking,
//! profile management and per-user data maintenance.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::Serialize;

use super::AppJson;
use crate::auth::{hash_password, verify_password, LinkState};
use crate::db::Repository;
use crate::errors::AppError;
use crate::models::{
    non_blank, normalize_email, validate_email, validate_name, validate_password,
    ChangePasswordRequest, GoogleAuthRequest, LoginRequest, MessageResponse, RegisterRequest,
    ResetPasswordRequest, Tag, TaskList, UpdateUserRequest, User, UserResponse,
};
use crate::ownership::{self, UserData};
use crate::AppState;

async fn load_user(repo: &Repository, id: &str) -> Result<User, AppError> {
    repo.get_user(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
}

/// POST /api/users/register - Create a password account with default data.
pub async fn register(
    State(state): State<AppState>,
    AppJson(request): AppJson<RegisterRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let email = normalize_email(&request.email);
    validate_name(&request.name)?;
    validate_email(&email)?;
    validate_password(&request.password)?;

    if state.repo.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::Validation(
            "User with this email already exists".to_string(),
        ));
    }

    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        name: request.name.trim().to_string(),
        email,
        password_hash: Some(hash_password(&request.password)?),
        google_id: None,
        profile_picture_url: None,
        created_at: Utc::now(),
        last_login_at: None,
        is_email_verified: true,
        has_password: true,
        has_google_login: false,
    };
    state.repo.create_user_with_defaults(&user).await?;

    Ok(Json(UserResponse::from(&user)))
}

/// POST /api/users/login - Password login.
pub async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let email = normalize_email(&request.email);
    let user = state.repo.find_user_by_email(&email).await?;

    let user = match user {
        Some(user)
            if user.has_password
                && user
                    .password_hash
                    .as_deref()
                    .is_some_and(|hash| verify_password(&request.password, hash)) =>
        {
            user
        }
        _ => {
            tracing::debug!("Rejected login attempt");
            return Err(AppError::Unauthorized(
                "Invalid email or password".to_string(),
            ));
        }
    };

    state.repo.touch_last_login(&user.id).await?;
    Ok(Json(UserResponse::from(&user)))
}

/// POST /api/users/google-auth - Log in with an external identity.
///
/// An unseen email creates an external-only account. An existing
/// password-only account with the same email gets the identity attached.
pub async fn google_auth(
    State(state): State<AppState>,
    AppJson(request): AppJson<GoogleAuthRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let email = normalize_email(&request.email);
    validate_email(&email)?;
    let google_id = request.google_id.trim();
    if google_id.is_empty() {
        return Err(AppError::Validation("Google id is required".to_string()));
    }
    let picture = non_blank(request.profile_picture_url.clone());

    let existing = match state.repo.find_user_by_email(&email).await? {
        Some(user) => Some(user),
        None => state.repo.find_user_by_google_id(google_id).await?,
    };

    let user_id = match existing {
        Some(user) => {
            let current = user.link_state();
            if current.is_some_and(LinkState::has_external) {
                state.repo.touch_last_login(&user.id).await?;
            } else {
                state
                    .repo
                    .link_google_identity(&user.id, google_id, picture.as_deref())
                    .await?;
                tracing::info!(
                    user_id = %user.id,
                    from = ?current,
                    to = ?current.map(LinkState::on_external_login),
                    "Linked external identity"
                );
            }
            user.id
        }
        None => {
            validate_name(&request.name)?;
            let now = Utc::now();
            let user = User {
                id: uuid::Uuid::new_v4().to_string(),
                name: request.name.trim().to_string(),
                email,
                password_hash: None,
                google_id: Some(google_id.to_string()),
                profile_picture_url: picture,
                created_at: now,
                last_login_at: Some(now),
                is_email_verified: true,
                has_password: false,
                has_google_login: true,
            };
            state.repo.create_user_with_defaults(&user).await?;
            user.id
        }
    };

    let user = load_user(&state.repo, &user_id).await?;
    Ok(Json(UserResponse::from(&user)))
}

/// GET /api/users/:id - Get a user profile.
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let user = load_user(&state.repo, &id).await?;
    Ok(Json(UserResponse::from(&user)))
}

/// PUT /api/users/:id - Update name and/or email.
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(request): AppJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let user = load_user(&state.repo, &id).await?;

    let name = match non_blank(request.name) {
        Some(name) => {
            validate_name(&name)?;
            name
        }
        None => user.name,
    };

    let email = match non_blank(request.email) {
        Some(email) => {
            let email = normalize_email(&email);
            validate_email(&email)?;
            if let Some(other) = state.repo.find_user_by_email(&email).await? {
                if other.id != id {
                    return Err(AppError::Validation("Email is already taken".to_string()));
                }
            }
            email
        }
        None => user.email,
    };

    state.repo.update_user_profile(&id, &name, &email).await?;
    let user = load_user(&state.repo, &id).await?;
    Ok(Json(UserResponse::from(&user)))
}

/// POST /api/users/:id/change-password
///
/// The current password is required only when the account has one.
pub async fn change_password(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(request): AppJson<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let user = load_user(&state.repo, &id).await?;
    validate_password(&request.new_password)?;

    let state_before = user.link_state();
    if state_before.is_some_and(LinkState::has_password) {
        let current_ok = user
            .password_hash
            .as_deref()
            .is_some_and(|hash| verify_password(&request.current_password, hash));
        if !current_ok {
            return Err(AppError::Validation(
                "Current password is incorrect".to_string(),
            ));
        }
    }

    let hash = hash_password(&request.new_password)?;
    state.repo.set_password(&id, &hash).await?;
    tracing::info!(
        user_id = %id,
        state = ?state_before.map(LinkState::on_password_set),
        "Password changed"
    );

    Ok(Json(MessageResponse::new("Password changed successfully")))
}

/// POST /api/users/reset-password
///
/// Always answers with the same message so callers cannot probe which
/// emails are registered.
pub async fn reset_password(
    State(state): State<AppState>,
    AppJson(request): AppJson<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    validate_password(&request.new_password)?;
    let email = normalize_email(&request.email);

    if let Some(user) = state.repo.find_user_by_email(&email).await? {
        let hash = hash_password(&request.new_password)?;
        state.repo.set_password(&user.id, &hash).await?;
        tracing::info!(user_id = %user.id, "Password reset");
    }

    Ok(Json(MessageResponse::new(
        "If the email exists, the password has been reset",
    )))
}

/// DELETE /api/users/:id - Delete the account and everything it owns.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.repo.delete_user(&id).await?;
    Ok(Json(MessageResponse::new("Account deleted successfully")))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultsResponse {
    pub lists: Vec<TaskList>,
    pub tags: Vec<Tag>,
}

/// POST /api/users/:id/seed-defaults - Create any missing default lists and tags.
pub async fn seed_defaults(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DefaultsResponse>, AppError> {
    load_user(&state.repo, &id).await?;
    state.repo.seed_user_defaults(&id).await?;

    let (lists, tags) = state.repo.user_defaults(&id).await?;
    Ok(Json(DefaultsResponse { lists, tags }))
}

/// POST /api/users/:id/reset - Remove all user data except the defaults.
pub async fn reset_user_data(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserData>, AppError> {
    load_user(&state.repo, &id).await?;
    let data = ownership::reset_user_data(state.repo.as_ref(), &id).await?;
    Ok(Json(data))
}
