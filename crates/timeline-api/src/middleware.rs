use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::state::AppState;

/// Resolve the bearer token and stash the `Requester` in request
/// extensions. Handlers behind this layer read it with
/// `Extension<Requester>`.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Authentication("Authentication required".to_string()))?;

    let requester = state.sessions.resolve_token(token)?;

    req.extensions_mut().insert(requester);
    Ok(next.run(req).await)
}
