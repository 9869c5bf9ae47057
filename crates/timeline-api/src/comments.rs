use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::info;

use timeline_policy::{Capability, Requester};
use timeline_types::api::{CommentListResponse, CommentResponse, ContentRequest, MessageResponse};
use timeline_types::models::CommentRecord;

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::gate;
use crate::posts;
use crate::state::{AppState, AppStateInner, blocking};
use crate::validation;

// Every comment route first resolves the parent post under the requester's
// visibility, so comments on a soft-deleted post are only reachable by admins.

pub async fn list_comments(
    State(state): State<AppState>,
    ApiPath(post_id): ApiPath<i64>,
    Extension(requester): Extension<Requester>,
) -> Result<impl IntoResponse, ApiError> {
    let comments = blocking(&state, move |s| {
        posts::load(s, post_id, &requester)?;
        let rows = s
            .db
            .list_comments(post_id, requester.visibility())
            .map_err(ApiError::Server)?;
        Ok(rows.into_iter().map(|row| row.into_record()).collect::<Vec<_>>())
    })
    .await?;

    Ok(Json(CommentListResponse { comments }))
}

pub async fn create_comment(
    State(state): State<AppState>,
    ApiPath(post_id): ApiPath<i64>,
    Extension(requester): Extension<Requester>,
    ApiJson(req): ApiJson<ContentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let content = validation::content(&req.content)?;

    let comment = blocking(&state, move |s| {
        // The parent must be live for everyone, admins and the post's own
        // author included.
        let id = s
            .db
            .insert_comment(post_id, requester.user_id, &content)
            .map_err(ApiError::store("Post"))?;
        load(s, post_id, id, &requester)
    })
    .await?;

    info!(
        "User {} commented {} on post {}",
        requester.user_id, comment.id, post_id
    );
    Ok((StatusCode::CREATED, Json(CommentResponse { comment })))
}

pub async fn get_comment(
    State(state): State<AppState>,
    ApiPath((post_id, id)): ApiPath<(i64, i64)>,
    Extension(requester): Extension<Requester>,
) -> Result<impl IntoResponse, ApiError> {
    let comment = blocking(&state, move |s| {
        posts::load(s, post_id, &requester)?;
        load(s, post_id, id, &requester)
    })
    .await?;

    Ok(Json(CommentResponse { comment }))
}

pub async fn update_comment(
    State(state): State<AppState>,
    ApiPath((post_id, id)): ApiPath<(i64, i64)>,
    Extension(requester): Extension<Requester>,
    ApiJson(req): ApiJson<ContentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let content = validation::content(&req.content)?;

    let comment = blocking(&state, move |s| {
        posts::load(s, post_id, &requester)?;
        let current = load(s, post_id, id, &requester)?;
        let grant = gate::check(&requester, Capability::ModifyContent { owner_id: current.user_id })?;

        let flags = s
            .db
            .edit_comment(id, &content, grant)
            .map_err(ApiError::store("Comment"))?;
        info!("User {} edited comment {} ({:?})", requester.user_id, id, flags.state());

        load(s, post_id, id, &requester)
    })
    .await?;

    Ok(Json(CommentResponse { comment }))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    ApiPath((post_id, id)): ApiPath<(i64, i64)>,
    Extension(requester): Extension<Requester>,
) -> Result<impl IntoResponse, ApiError> {
    blocking(&state, move |s| {
        posts::load(s, post_id, &requester)?;
        let current = load(s, post_id, id, &requester)?;
        gate::check(&requester, Capability::ModifyContent { owner_id: current.user_id })?;

        s.db.soft_delete_comment(id).map_err(ApiError::store("Comment"))?;
        info!("User {} deleted comment {}", requester.user_id, id);
        Ok(())
    })
    .await?;

    Ok(Json(MessageResponse {
        message: "Comment deleted successfully".to_string(),
    }))
}

fn load(
    s: &AppStateInner,
    post_id: i64,
    id: i64,
    requester: &Requester,
) -> Result<CommentRecord, ApiError> {
    s.db.get_comment(post_id, id, requester.visibility())
        .map_err(ApiError::Server)?
        .map(|row| row.into_record())
        .ok_or(ApiError::NotFound("Comment"))
}
