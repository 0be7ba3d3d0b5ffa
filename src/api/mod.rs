//! HTTP surface of the ATM: routes, handlers and status mapping.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod routes;

pub use error::ApiError;
pub use extract::JsonBody;
pub use routes::{create_router, AppState};
