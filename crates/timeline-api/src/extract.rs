//! `Json`, `Path` and `Query` wrappers whose rejections come back as
//! `ApiError` validation failures instead of axum's plain-text bodies.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ApiError;

pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(path_rejection(rejection)),
        }
    }
}

/// Query-string extractor. A repeated key keeps its first value, so
/// `?limit=5&limit=6` reads as `limit=5`. Keys `T` doesn't name are ignored.
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(query_rejection)?;

        serde_json::from_value(Value::Object(first_wins(pairs)))
            .map(Self)
            .map_err(|e| ApiError::field("query", e.to_string()))
    }
}

fn first_wins(pairs: Vec<(String, String)>) -> Map<String, Value> {
    let mut map = Map::new();
    for (key, value) in pairs {
        map.entry(key).or_insert(Value::String(value));
    }
    map
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    ApiError::field("body", rejection.body_text())
}

fn path_rejection(rejection: PathRejection) -> ApiError {
    ApiError::field("path", rejection.body_text())
}

fn query_rejection(rejection: QueryRejection) -> ApiError {
    ApiError::field("query", rejection.body_text())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn repeated_keys_keep_the_first_value() {
        let map = first_wins(pairs(&[("limit", "5"), ("offset", "2"), ("limit", "6")]));
        assert_eq!(map["limit"], "5");
        assert_eq!(map["offset"], "2");
        assert_eq!(map.len(), 2);
    }
}
