use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::info;

use timeline_db::filter::PostFilter;
use timeline_policy::{Capability, Page, PageRequest, Requester, SearchTerm};
use timeline_types::api::{
    ContentRequest, MessageResponse, PaginationInfo, PostListResponse, PostResponse,
};
use timeline_types::models::PostRecord;

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::gate;
use crate::state::{AppState, AppStateInner, blocking};
use crate::validation;

/// Raw paging parameters. Kept as strings so unusable values fall back to
/// defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

pub async fn list_posts(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
    Extension(requester): Extension<Requester>,
) -> Result<impl IntoResponse, ApiError> {
    let page = PageRequest::from_query(query.limit.as_deref(), query.offset.as_deref());
    let posts = blocking(&state, move |s| {
        list(s, PostFilter::new(requester.visibility()), page)
    })
    .await?;

    Ok(Json(list_response(posts)))
}

pub async fn search_posts(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SearchQuery>,
    Extension(requester): Extension<Requester>,
) -> Result<impl IntoResponse, ApiError> {
    let term = SearchTerm::parse(query.q.as_deref().unwrap_or_default())
        .map_err(|e| ApiError::field("q", e.to_string()))?;
    let page = PageRequest::from_query(query.limit.as_deref(), query.offset.as_deref());

    let posts = blocking(&state, move |s| {
        let filter = PostFilter::new(requester.visibility()).with_search(Some(&term));
        list(s, filter, page)
    })
    .await?;

    Ok(Json(list_response(posts)))
}

pub async fn create_post(
    State(state): State<AppState>,
    Extension(requester): Extension<Requester>,
    ApiJson(req): ApiJson<ContentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let content = validation::content(&req.content)?;

    let post = blocking(&state, move |s| {
        let id = s
            .db
            .insert_post(requester.user_id, &content)
            .map_err(ApiError::Server)?;
        load(s, id, &requester)
    })
    .await?;

    info!("User {} created post {}", requester.user_id, post.id);
    Ok((StatusCode::CREATED, Json(PostResponse { post })))
}

pub async fn get_post(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    Extension(requester): Extension<Requester>,
) -> Result<impl IntoResponse, ApiError> {
    let post = blocking(&state, move |s| load(s, id, &requester)).await?;
    Ok(Json(PostResponse { post }))
}

pub async fn update_post(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    Extension(requester): Extension<Requester>,
    ApiJson(req): ApiJson<ContentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let content = validation::content(&req.content)?;

    let post = blocking(&state, move |s| {
        let current = load(s, id, &requester)?;
        let grant = gate::check(&requester, Capability::ModifyContent { owner_id: current.user_id })?;

        let flags = s
            .db
            .edit_post(id, &content, grant)
            .map_err(ApiError::store("Post"))?;
        info!("User {} edited post {} ({:?})", requester.user_id, id, flags.state());

        load(s, id, &requester)
    })
    .await?;

    Ok(Json(PostResponse { post }))
}

pub async fn delete_post(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    Extension(requester): Extension<Requester>,
) -> Result<impl IntoResponse, ApiError> {
    blocking(&state, move |s| {
        let current = load(s, id, &requester)?;
        gate::check(&requester, Capability::ModifyContent { owner_id: current.user_id })?;

        s.db.soft_delete_post(id).map_err(ApiError::store("Post"))?;
        info!("User {} deleted post {}", requester.user_id, id);
        Ok(())
    })
    .await?;

    Ok(Json(MessageResponse {
        message: "Post deleted successfully".to_string(),
    }))
}

/// Post `id` as `requester` may see it. Soft-deleted posts are NotFound
/// for non-admins, the same as posts that never existed.
pub(crate) fn load(s: &AppStateInner, id: i64, requester: &Requester) -> Result<PostRecord, ApiError> {
    s.db.get_post(id, requester.visibility())
        .map_err(ApiError::Server)?
        .map(|row| row.into_record())
        .ok_or(ApiError::NotFound("Post"))
}

fn list(
    s: &AppStateInner,
    filter: PostFilter<'_>,
    page: PageRequest,
) -> Result<Page<PostRecord>, ApiError> {
    let rows = s.db.list_posts(&filter, page).map_err(ApiError::Server)?;
    Ok(rows.map(|row| row.into_record()))
}

fn list_response(page: Page<PostRecord>) -> PostListResponse {
    let pagination = PaginationInfo {
        limit: page.request.limit,
        offset: page.request.offset,
        total: page.total,
        has_more: page.has_more(),
    };
    PostListResponse {
        posts: page.items,
        pagination,
    }
}
