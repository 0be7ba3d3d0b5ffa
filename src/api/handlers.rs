//! ATM endpoint handlers
//!
//! Handlers behind the gate still map every `AtmError` themselves; the gate
//! only guarantees the token was live when the request came in.

use crate::{
    api::{ApiError, AppState, JsonBody},
    auth::SessionToken,
    models::{AmountRequest, BalanceResponse, LoginRequest, LoginResponse},
};
use axum::{extract::State, http::StatusCode, Json};

/// Login endpoint - POST /login
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let token = state.atm.login(&payload.username, payload.pin).await?;
    Ok(Json(LoginResponse { token }))
}

/// View balance - GET /balance
pub async fn view_balance(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
) -> Result<Json<BalanceResponse>, ApiError> {
    let balance = state.atm.get_balance(token).await?;
    Ok(Json(BalanceResponse { balance }))
}

/// Deposit - POST /balance/deposit
pub async fn deposit(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    JsonBody(payload): JsonBody<AmountRequest>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let balance = state.atm.deposit_money(token, payload.amount).await?;
    Ok(Json(BalanceResponse { balance }))
}

/// Withdraw - POST /balance/withdraw
pub async fn withdraw(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    JsonBody(payload): JsonBody<AmountRequest>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let balance = state.atm.withdraw_money(token, payload.amount).await?;
    Ok(Json(BalanceResponse { balance }))
}

/// Logout - POST /logout (only routed when enabled)
pub async fn logout(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
) -> Result<StatusCode, ApiError> {
    state.atm.logout(token).await?;
    Ok(StatusCode::NO_CONTENT)
}
