//! Request extractors
//!
//! Bodies are decoded as JSON whatever the `Content-Type` header says.

use std::convert::Infallible;

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::{
    error::ApiError,
    models::{IdQuery, Order},
};

/// JSON body that ignores `Content-Type` and rejects with [`ApiError::BadRequest`]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;

        serde_json::from_slice(&bytes)
            .map(JsonBody)
            .map_err(|e| ApiError::BadRequest(e.to_string()))
    }
}

#[async_trait]
impl<S> FromRequest<S> for Order
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|_| ApiError::InvalidOrder)?;

        Order::parse(&bytes).map_err(|_| ApiError::InvalidOrder)
    }
}

/// Never rejects: an unreadable query string reads as no `id` at all, and
/// the first `id` wins when several are given.
#[async_trait]
impl<S> FromRequestParts<S> for IdQuery
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(pairs)| {
                pairs
                    .into_iter()
                    .find(|(key, _)| key == "id")
                    .map(|(_, value)| value)
            });

        Ok(IdQuery { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, Uri};
    use uuid::Uuid;

    async fn extract(uri: &str) -> IdQuery {
        let (mut parts, ()) = Request::builder()
            .uri(uri.parse::<Uri>().unwrap())
            .body(())
            .unwrap()
            .into_parts();
        IdQuery::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_first_id_wins() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let query = extract(&format!("/getUser?id={}&id={}", first, second)).await;
        assert_eq!(query.user_id(), Some(first));
    }

    #[tokio::test]
    async fn test_unrelated_or_missing_parameters() {
        let id = Uuid::new_v4();
        let query = extract(&format!("/getUser?verbose=1&id={}", id)).await;
        assert_eq!(query.user_id(), Some(id));

        assert_eq!(extract("/getUser").await.id, None);
        assert_eq!(extract("/getUser?name=Ada").await.id, None);
        assert_eq!(extract("/getUser?id=x&id=y").await.user_id(), None);
    }
}
