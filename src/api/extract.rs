//! Request body extraction.
//!
//! Bodies are decoded as JSON whatever the `Content-Type` says, so clients
//! that post raw JSON (e.g. `curl -d`) are served. Only an unreadable body
//! or invalid JSON is rejected.

use crate::api::ApiError;
use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

/// JSON body that ignores the `Content-Type` header.
#[derive(Debug, Clone, Copy, Default)]
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
            .map_err(|e| ApiError::MalformedBody(e.body_text()))?;

        serde_json::from_slice(&bytes)
            .map(JsonBody)
            .map_err(|e| ApiError::MalformedBody(format!("invalid JSON body: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AmountRequest;
    use axum::body::Body;

    async fn extract(body: &'static str) -> Result<AmountRequest, ApiError> {
        let req = Request::builder().body(Body::from(body)).unwrap();
        JsonBody::<AmountRequest>::from_request(req, &())
            .await
            .map(|JsonBody(v)| v)
    }

    #[tokio::test]
    async fn test_decodes_without_content_type() {
        assert_eq!(extract(r#"{"amount": 2.5}"#).await.unwrap().amount, 2.5);
    }

    #[tokio::test]
    async fn test_invalid_json_is_malformed_body() {
        assert!(matches!(
            extract(r#"{"amount": "#).await,
            Err(ApiError::MalformedBody(_))
        ));
        assert!(matches!(
            extract("").await,
            Err(ApiError::MalformedBody(_))
        ));
    }
}
