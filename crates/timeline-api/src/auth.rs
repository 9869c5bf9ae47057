use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use rand_core::OsRng;
use tracing::info;

use timeline_policy::Requester;
use timeline_types::api::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::{AppState, blocking};
use crate::validation;

pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let new_user = validation::registration(req)?;

    let user = blocking(&state, move |s| {
        let password_hash = hash_password(&new_user.password)?;
        let row = s
            .db
            .create_user(&new_user.username, &password_hash, &new_user.full_name, new_user.role)
            .map_err(ApiError::store("User"))?;
        row.profile().map_err(ApiError::Server)
    })
    .await?;

    let token = state
        .sessions
        .issue_token(user.id, user.role)
        .map_err(ApiError::Server)?;

    info!("Registered user {} ({}) as {}", user.username, user.id, user.role);
    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let username = validation::login(&req.username, &req.password)?;
    let password = req.password;

    let user = blocking(&state, move |s| {
        let row = s
            .db
            .get_user_by_username(&username)
            .map_err(ApiError::Server)?
            .ok_or_else(invalid_credentials)?;

        if !verify_password(&password, &row.password)? {
            return Err(invalid_credentials());
        }
        row.profile().map_err(ApiError::Server)
    })
    .await?;

    let token = state
        .sessions
        .issue_token(user.id, user.role)
        .map_err(ApiError::Server)?;

    Ok(Json(AuthResponse { token, user }))
}

pub async fn me(
    State(state): State<AppState>,
    Extension(requester): Extension<Requester>,
) -> Result<impl IntoResponse, ApiError> {
    let user = blocking(&state, move |s| {
        let row = s
            .db
            .get_user_by_id(requester.user_id)
            .map_err(ApiError::Server)?
            .ok_or_else(|| ApiError::Authentication("User not found".to_string()))?;
        row.profile().map_err(ApiError::Server)
    })
    .await?;

    Ok(Json(UserResponse { user }))
}

fn invalid_credentials() -> ApiError {
    ApiError::Authentication("Invalid credentials".to_string())
}

/// Argon2id with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Server(anyhow::anyhow!("Password hashing failed: {}", e)))
}

/// `Ok(false)` on mismatch; `Err` only when the stored hash is unreadable.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, ApiError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| ApiError::Server(anyhow::anyhow!("Corrupt password hash: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
