//! Authentication handlers

use std::time::Duration;

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::UserPublic;
use crate::db::repository::UserRepository;
use crate::utils::{AppError, AppResult};

/// Fixed delay for authentication to blunt timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserPublic,
}

/// Login handler
///
/// Verifies credentials and returns a bearer token. Failures share one
/// message so accounts cannot be enumerated.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let users = UserRepository::new(state.get_db());
    let user = users.find_by_email(&req.email).await?;

    // Delay before inspecting the lookup result
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let user = match user {
        Some(u) => {
            if !u.is_active {
                return Err(AppError::forbidden("Account has been disabled"));
            }

            let password_valid = u
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;
            if !password_valid {
                tracing::warn!(email = %req.email, "Login failed, invalid credentials");
                return Err(AppError::invalid_credentials());
            }

            u
        }
        None => {
            tracing::warn!(email = %req.email, "Login failed, user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    let user_id = user.id.as_ref().map(|t| t.to_string()).unwrap_or_default();
    let token = state
        .get_jwt_service()
        .generate_token(&user_id, &user.name, user.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(user_id = %user_id, role = %user.role, "User logged in");

    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}

/// Current user info, freshly loaded from the database
pub async fn me(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<UserPublic>> {
    let users = UserRepository::new(state.get_db());
    let fresh = users
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", user.id)))?;
    Ok(Json(fresh.into()))
}
