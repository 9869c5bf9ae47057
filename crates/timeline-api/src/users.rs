use axum::{Extension, Json, extract::State, response::IntoResponse};
use tracing::info;

use timeline_policy::{Capability, Requester};
use timeline_types::api::{UpdateProfileRequest, UpdateRoleRequest, UserResponse};

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::gate;
use crate::state::{AppState, blocking};
use crate::validation;

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(requester): Extension<Requester>,
    ApiJson(req): ApiJson<UpdateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let full_name = validation::full_name(&req.full_name)?;

    let user = blocking(&state, move |s| {
        let row = s
            .db
            .update_full_name(requester.user_id, &full_name)
            .map_err(ApiError::Server)?
            .ok_or_else(|| ApiError::Authentication("User not found".to_string()))?;
        row.profile().map_err(ApiError::Server)
    })
    .await?;

    Ok(Json(UserResponse { user }))
}

/// Administrative role change. Tokens already issued to the target keep
/// the role they were issued with until they expire.
pub async fn update_role(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    Extension(requester): Extension<Requester>,
    ApiJson(req): ApiJson<UpdateRoleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    gate::check(&requester, Capability::ManageUsers)?;
    let role = validation::role(&req.role)?;

    let user = blocking(&state, move |s| {
        let row = s
            .db
            .update_role(id, role)
            .map_err(ApiError::Server)?
            .ok_or(ApiError::NotFound("User"))?;
        row.profile().map_err(ApiError::Server)
    })
    .await?;

    info!("User {} set role of user {} to {}", requester.user_id, user.id, user.role);
    Ok(Json(UserResponse { user }))
}
