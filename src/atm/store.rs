//! Session/Ledger Store
//! Mission: Validate credentials, issue session tokens, and keep balances
//!
//! The credential registry is fixed at construction. Sessions live in one
//! map behind a `parking_lot::Mutex`; every read-modify-write on a balance
//! happens under a single lock acquisition so concurrent deposits never lose
//! updates.

use crate::atm::{Atm, AtmError, Token};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// In-memory ATM backend. Nothing survives a restart.
pub struct InMemoryAtm {
    accounts: HashMap<String, i64>,
    sessions: Mutex<HashMap<Token, f64>>,
}

impl InMemoryAtm {
    /// Create a store seeded with `username -> pin` entries.
    pub fn new(accounts: HashMap<String, i64>) -> Self {
        info!("🏧 ATM store ready with {} account(s)", accounts.len());
        Self {
            accounts,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Number of open sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.lock().len()
    }

    /// Apply `f` to the balance of `token` and return the result, all under
    /// one lock.
    fn update_balance(&self, token: Token, f: impl FnOnce(f64) -> f64) -> Result<f64, AtmError> {
        let mut sessions = self.sessions.lock();
        let balance = sessions
            .get_mut(&token)
            .ok_or_else(|| AtmError::unauthenticated("bad token"))?;
        *balance = f(*balance);
        Ok(*balance)
    }
}

#[async_trait]
impl Atm for InMemoryAtm {
    async fn login(&self, username: &str, pin: i64) -> Result<Token, AtmError> {
        match self.accounts.get(username) {
            Some(&expected) if expected == pin => {
                let token = Uuid::new_v4();
                self.sessions.lock().insert(token, 0.0);
                info!(username, token = %short(&token), "✅ Session opened");
                Ok(token)
            }
            _ => {
                warn!(username, "❌ Failed login attempt");
                Err(AtmError::unauthenticated("not authenticated"))
            }
        }
    }

    async fn is_authenticated(&self, token: Token) -> Result<(), AtmError> {
        if self.sessions.lock().contains_key(&token) {
            Ok(())
        } else {
            Err(AtmError::unauthenticated("not authenticated"))
        }
    }

    async fn get_balance(&self, token: Token) -> Result<f64, AtmError> {
        self.sessions
            .lock()
            .get(&token)
            .copied()
            .ok_or_else(|| AtmError::unauthenticated("bad token"))
    }

    async fn deposit_money(&self, token: Token, amount: f64) -> Result<f64, AtmError> {
        let balance = self.update_balance(token, |b| b + amount)?;
        debug!(token = %short(&token), amount, balance, "Deposit applied");
        Ok(balance)
    }

    async fn withdraw_money(&self, token: Token, amount: f64) -> Result<f64, AtmError> {
        // No sufficient-funds check: the balance is allowed to go negative.
        let balance = self.update_balance(token, |b| b - amount)?;
        debug!(token = %short(&token), amount, balance, "Withdrawal applied");
        Ok(balance)
    }

    async fn logout(&self, token: Token) -> Result<(), AtmError> {
        match self.sessions.lock().remove(&token) {
            Some(_) => {
                info!(token = %short(&token), "👋 Session closed");
                Ok(())
            }
            None => Err(AtmError::unauthenticated("not authenticated")),
        }
    }
}

/// First block of a token, enough to correlate log lines.
fn short(token: &Token) -> String {
    token.simple().to_string()[..8].to_string()
}
