//! ATM Service Library
//!
//! Exposes the ATM core, the auth gate and the HTTP router for the binary
//! and for tests.

pub mod api;
pub mod atm;
pub mod auth;
pub mod config;
pub mod middleware;
pub mod models;

pub use api::create_router;
pub use atm::{Atm, AtmError, InMemoryAtm};
