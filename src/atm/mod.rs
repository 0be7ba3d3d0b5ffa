//! ATM Core
//! Mission: Authenticate account holders and move their session balances
//!
//! `Atm` is the capability the HTTP layer talks to. `InMemoryAtm` is the
//! only backend today; a networked or persistent one plugs in behind the
//! same trait without touching the gate or the handlers.

pub mod error;
pub mod store;

pub use error::{AtmError, Retry};
pub use store::InMemoryAtm;

use async_trait::async_trait;
use uuid::Uuid;

/// Session token handed out by a successful login.
pub type Token = Uuid;

#[async_trait]
pub trait Atm: Send + Sync {
    /// Check credentials and open a new session with a zero balance.
    async fn login(&self, username: &str, pin: i64) -> Result<Token, AtmError>;

    /// `Ok(())` iff the token belongs to a live session.
    async fn is_authenticated(&self, token: Token) -> Result<(), AtmError>;

    async fn get_balance(&self, token: Token) -> Result<f64, AtmError>;

    /// Add `amount` to the balance and return the new balance.
    async fn deposit_money(&self, token: Token, amount: f64) -> Result<f64, AtmError>;

    /// Subtract `amount` from the balance and return the new balance.
    /// The result may be negative.
    async fn withdraw_money(&self, token: Token, amount: f64) -> Result<f64, AtmError>;

    /// Close a session. Only routed when logout is enabled in config.
    async fn logout(&self, token: Token) -> Result<(), AtmError>;
}
