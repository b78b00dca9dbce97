//! User API handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::core::ServerState;
use crate::db::models::{UserCreate, UserPublic, UserUpdate};
use crate::db::repository::UserRepository;
use crate::utils::{AppError, AppResult};

/// List all users
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<UserPublic>>> {
    let repo = UserRepository::new(state.get_db());
    let users = repo.find_all().await?;
    Ok(Json(users.into_iter().map(UserPublic::from).collect()))
}

/// Get user by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserPublic>> {
    let repo = UserRepository::new(state.get_db());
    let user = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", id)))?;
    Ok(Json(user.into()))
}

/// Create a new user
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<UserCreate>,
) -> AppResult<(StatusCode, Json<UserPublic>)> {
    if payload.password.len() < 6 {
        return Err(AppError::validation(
            "Password must be at least 6 characters",
        ));
    }

    let repo = UserRepository::new(state.get_db());
    let user = repo.create(payload).await?;
    tracing::info!(user = ?user.id, "User created");
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Update a user
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<UserPublic>> {
    let repo = UserRepository::new(state.get_db());
    let user = repo.update(&id, payload).await?;
    tracing::info!(user = %id, "User updated");
    Ok(Json(user.into()))
}

/// Delete a user
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = UserRepository::new(state.get_db());
    let result = repo.delete(&id).await?;
    tracing::info!(user = %id, "User deleted");
    Ok(Json(result))
}
