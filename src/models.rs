use crate::atm::Token;
use serde::{Deserialize, Serialize};

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub pin: i64,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: Token,
}

/// Deposit/withdraw request body
#[derive(Debug, Deserialize)]
pub struct AmountRequest {
    pub amount: f64,
}

/// Balance after a read or a mutation
#[derive(Debug, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub balance: f64,
}
