//! Status mapping shared by the auth gate and the handlers.
//!
//! Identity failures are 401. Everything else, including malformed tokens
//! and unreadable bodies, is a 500.

use crate::atm::AtmError;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, error};

#[derive(Debug)]
pub enum ApiError {
    /// Credential or token is not valid.
    Unauthorized(String),
    /// `token` header missing or not a canonical UUID.
    MalformedToken(String),
    /// Request body could not be read or decoded.
    MalformedBody(String),
    /// Caller was valid but the backend failed.
    Internal {
        message: String,
        retry_after: Option<Duration>,
    },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::MalformedToken(_)
            | ApiError::MalformedBody(_)
            | ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::MalformedToken(_) => "malformed_token",
            ApiError::MalformedBody(_) => "malformed_body",
            ApiError::Internal { .. } => "internal_error",
        }
    }
}

impl From<AtmError> for ApiError {
    fn from(err: AtmError) -> Self {
        if !err.is_authenticated() {
            return ApiError::Unauthorized(err.to_string());
        }
        let retry_after = err.is_retryable().then(|| err.retry_after());
        ApiError::Internal {
            message: err.to_string(),
            retry_after,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (message, retry_after) = match &self {
            ApiError::Unauthorized(msg) => {
                debug!("Rejected unauthenticated request: {}", msg);
                ("Not authenticated".to_string(), None)
            }
            ApiError::MalformedToken(msg) | ApiError::MalformedBody(msg) => {
                error!("Malformed request: {}", msg);
                (msg.clone(), None)
            }
            ApiError::Internal {
                message,
                retry_after,
            } => {
                error!("ATM backend error: {}", message);
                ("Internal server error".to_string(), *retry_after)
            }
        };

        let body = Json(json!({
            "error": self.kind(),
            "message": message,
        }));

        match retry_after {
            Some(delay) => {
                // Round up so a sub-second backoff never becomes "retry now".
                let secs = delay.as_secs() + u64::from(delay.subsec_nanos() > 0);
                (status, [(header::RETRY_AFTER, secs.to_string())], body).into_response()
            }
            None => (status, body).into_response(),
        }
    }
}
