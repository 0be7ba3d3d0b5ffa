//! Authentication Middleware
//! Mission: Protect balance endpoints with session token validation

use crate::api::{ApiError, AppState};
use crate::atm::Token;
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;
use uuid::Uuid;

/// Header carrying the bare session token (no `Bearer` scheme).
pub const TOKEN_HEADER: &str = "token";

/// Length of the canonical hyphenated UUID form.
const CANONICAL_TOKEN_LEN: usize = 36;

/// Read the session token from request headers.
///
/// Anything other than a canonical `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx`
/// string is a malformed token, not an authentication failure.
pub fn parse_token(headers: &HeaderMap) -> Result<Token, ApiError> {
    let raw = headers
        .get(TOKEN_HEADER)
        .ok_or_else(|| ApiError::MalformedToken("missing token header".to_string()))?
        .to_str()
        .map_err(|_| ApiError::MalformedToken("token header is not ASCII".to_string()))?;

    if raw.len() != CANONICAL_TOKEN_LEN {
        return Err(ApiError::MalformedToken(format!(
            "token must be {} characters, got {}",
            CANONICAL_TOKEN_LEN,
            raw.len()
        )));
    }

    Uuid::try_parse(raw).map_err(|e| ApiError::MalformedToken(format!("invalid token: {}", e)))
}

/// Gate in front of every protected route.
///
/// Forwards the request only when the ATM recognises the token. An ATM
/// error that still reports the caller as authenticated is a server fault,
/// anything else is a 401.
pub async fn atm_auth_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = parse_token(req.headers())?;

    if let Err(err) = state.atm.is_authenticated(token).await {
        debug!(
            path = %req.uri().path(),
            authenticated = err.is_authenticated(),
            "Gate rejected request: {}",
            err
        );
        return Err(err.into());
    }

    Ok(next.run(req).await)
}

/// Token extractor for handlers behind the gate.
///
/// Re-reads the header rather than trusting request extensions, so a
/// handler mounted without the gate still classifies failures the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionToken(pub Token);

#[async_trait]
impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parse_token(&parts.headers).map(SessionToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atm::{Atm, AtmError};
    use axum::{
        body::Body,
        http::{header, Request as HttpRequest, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };
    use std::time::Duration;
    use tower::ServiceExt;

    /// ATM whose `is_authenticated` answer is fixed per test.
    struct StubAtm {
        answer: Result<(), AtmError>,
    }

    impl StubAtm {
        fn answering(answer: Result<(), AtmError>) -> Arc<Self> {
            Arc::new(Self { answer })
        }
    }

    #[async_trait]
    impl Atm for StubAtm {
        async fn login(&self, _username: &str, _pin: i64) -> Result<Token, AtmError> {
            unreachable!("gate never logs in")
        }

        async fn is_authenticated(&self, _token: Token) -> Result<(), AtmError> {
            self.answer.clone()
        }

        async fn get_balance(&self, _token: Token) -> Result<f64, AtmError> {
            unreachable!("gate never reads balances")
        }

        async fn deposit_money(&self, _token: Token, _amount: f64) -> Result<f64, AtmError> {
            unreachable!("gate never deposits")
        }

        async fn withdraw_money(&self, _token: Token, _amount: f64) -> Result<f64, AtmError> {
            unreachable!("gate never withdraws")
        }

        async fn logout(&self, _token: Token) -> Result<(), AtmError> {
            unreachable!("gate never logs out")
        }
    }

    fn gated_app(atm: Arc<StubAtm>, hits: Arc<AtomicUsize>) -> Router {
        let state = AppState { atm };
        Router::new()
            .route(
                "/protected",
                get(move || {
                    let hits = hits.clone();
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        "ok"
                    }
                }),
            )
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                atm_auth_middleware,
            ))
            .with_state(state)
    }

    fn request_with_token(token: Option<&str>) -> HttpRequest<Body> {
        let mut builder = HttpRequest::builder().uri("/protected");
        if let Some(token) = token {
            builder = builder.header(TOKEN_HEADER, token);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn status_for(answer: Result<(), AtmError>, token: Option<&str>) -> (StatusCode, usize) {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = gated_app(StubAtm::answering(answer), hits.clone());
        let response = app.oneshot(request_with_token(token)).await.unwrap();
        (response.status(), hits.load(Ordering::SeqCst))
    }

    #[tokio::test]
    async fn test_valid_token_is_forwarded() {
        let token = Uuid::new_v4().to_string();
        let (status, hits) = status_for(Ok(()), Some(token.as_str())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(hits, 1);
    }

    #[tokio::test]
    async fn test_unauthenticated_is_401_and_not_forwarded() {
        let token = Uuid::new_v4().to_string();
        let answer = Err(AtmError::unauthenticated("not authenticated"));
        let (status, hits) = status_for(answer, Some(token.as_str())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(hits, 0);
    }

    #[tokio::test]
    async fn test_authenticated_failure_is_500() {
        let token = Uuid::new_v4().to_string();
        let answer = Err(AtmError::internal("ledger down"));
        let (status, hits) = status_for(answer, Some(token.as_str())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(hits, 0);
    }

    #[tokio::test]
    async fn test_retryable_failure_carries_retry_after() {
        let hits = Arc::new(AtomicUsize::new(0));
        let atm = StubAtm::answering(Err(AtmError::transient("busy", Duration::from_secs(5))));
        let token = Uuid::new_v4().to_string();
        let response = gated_app(atm, hits)
            .oneshot(request_with_token(Some(token.as_str())))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "5");
    }

    #[tokio::test]
    async fn test_missing_or_malformed_token_is_500() {
        let (status, hits) = status_for(Ok(()), None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(hits, 0);

        let (status, hits) = status_for(Ok(()), Some("not-a-token")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(hits, 0);
    }

    #[test]
    fn test_parse_token_accepts_only_canonical_form() {
        let token = Uuid::new_v4();
        let mut headers = HeaderMap::new();

        headers.insert(TOKEN_HEADER, token.to_string().parse().unwrap());
        assert_eq!(parse_token(&headers).unwrap(), token);

        headers.insert(TOKEN_HEADER, token.simple().to_string().parse().unwrap());
        assert!(matches!(
            parse_token(&headers),
            Err(ApiError::MalformedToken(_))
        ));

        headers.insert(
            TOKEN_HEADER,
            format!("Bearer {}", token).parse().unwrap(),
        );
        assert!(parse_token(&headers).is_err());

        // 36 characters, but not hex.
        headers.insert(
            TOKEN_HEADER,
            "zzzzzzzz-zzzz-zzzz-zzzz-zzzzzzzzzzzz".parse().unwrap(),
        );
        assert!(parse_token(&headers).is_err());
    }

    #[test]
    fn test_parse_token_missing_header() {
        assert!(matches!(
            parse_token(&HeaderMap::new()),
            Err(ApiError::MalformedToken(_))
        ));
    }
}
