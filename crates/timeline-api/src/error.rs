use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use timeline_db::DbError;
use timeline_types::api::{ErrorBody, FieldError};

use crate::session::TokenError;

/// Every failure a request can end in. Each maps to exactly one status.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    Authentication(String),

    #[error("Permission denied")]
    PermissionDenied,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Server error: {0}")]
    Server(anyhow::Error),
}

impl ApiError {
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError {
            field: field.to_string(),
            message: message.into(),
        }])
    }

    /// Map a store error for a lookup or mutation on `resource`.
    pub fn store(resource: &'static str) -> impl Fn(anyhow::Error) -> Self {
        move |err| match err.downcast_ref::<DbError>() {
            Some(DbError::NotFound) => Self::NotFound(resource),
            Some(DbError::UsernameTaken(_)) => Self::field("username", "Username already exists"),
            Some(DbError::Transition(e)) => Self::field("content", capitalize(&e.to_string())),
            None => Self::Server(err),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Authentication(_) => StatusCode::UNAUTHORIZED,
            Self::PermissionDenied => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        Self::Authentication(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::Validation(errors) => ErrorBody {
                error: match errors.as_slice() {
                    [single] => single.message.clone(),
                    _ => "Validation failed".to_string(),
                },
                errors,
            },
            Self::Server(e) => {
                error!("Server error: {:#}", e);
                ErrorBody {
                    error: "Server error".to_string(),
                    errors: vec![],
                }
            }
            other => ErrorBody {
                error: other.to_string(),
                errors: vec![],
            },
        };

        (status, Json(body)).into_response()
    }
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
