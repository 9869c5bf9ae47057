use std::sync::Arc;

use anyhow::anyhow;
use tracing::error;

use timeline_db::Database;

use crate::error::ApiError;
use crate::session::SessionIssuer;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub sessions: SessionIssuer,
}

impl AppStateInner {
    pub fn new(db: Database, sessions: SessionIssuer) -> AppState {
        Arc::new(Self { db, sessions })
    }
}

/// Run blocking store work off the async runtime.
pub(crate) async fn blocking<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&AppStateInner) -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Server(anyhow!("blocking task failed: {}", e))
        })?
}
