use axum::{
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    api::handlers,
    atm::Atm,
    auth::atm_auth_middleware,
    middleware::request_logging,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub atm: Arc<dyn Atm>,
}

/// Create the API router
///
/// `/login` and `/health` are public. Balance routes (and `/logout` when
/// `enable_logout` is set) sit behind the auth gate.
pub fn create_router(atm: Arc<dyn Atm>, enable_logout: bool) -> Router {
    let state = AppState { atm };

    let mut protected = Router::new()
        .route("/balance", get(handlers::view_balance))
        .route("/balance/deposit", post(handlers::deposit))
        .route("/balance/withdraw", post(handlers::withdraw));

    if enable_logout {
        protected = protected.route("/logout", post(handlers::logout));
    }

    let protected = protected.route_layer(middleware::from_fn_with_state(
        state.clone(),
        atm_auth_middleware,
    ));

    Router::new()
        .route("/health", get(health_check))
        .route("/login", post(handlers::login))
        .merge(protected)
        .layer(middleware::from_fn(request_logging))
        .with_state(state)
}

// ===== Route Handlers =====

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}
