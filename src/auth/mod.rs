//! Authorization Gate
//! Mission: Keep every balance endpoint behind a live session token

pub mod middleware;

pub use middleware::{atm_auth_middleware, parse_token, SessionToken, TOKEN_HEADER};
