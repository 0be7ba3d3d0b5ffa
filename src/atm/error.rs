//! ATM error taxonomy
//!
//! A failure is either about identity (`Unauthenticated`) or about
//! something that broke while the caller was already valid (`Internal`).
//! Only the latter can ask to be retried.

use std::time::Duration;
use thiserror::Error;

/// Retry hint carried by internal faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retry {
    Never,
    After(Duration),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AtmError {
    #[error("not authenticated: {reason}")]
    Unauthenticated { reason: String },

    #[error("internal fault: {message}")]
    Internal { message: String, retry: Retry },
}

impl AtmError {
    pub fn unauthenticated(reason: impl Into<String>) -> Self {
        AtmError::Unauthenticated {
            reason: reason.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AtmError::Internal {
            message: message.into(),
            retry: Retry::Never,
        }
    }

    /// Internal fault the caller may retry after `delay`.
    pub fn transient(message: impl Into<String>, delay: Duration) -> Self {
        AtmError::Internal {
            message: message.into(),
            retry: Retry::After(delay),
        }
    }

    /// True when the credential itself was fine and the failure is unrelated
    /// to identity.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AtmError::Internal { .. })
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AtmError::Internal {
                retry: Retry::After(_),
                ..
            }
        )
    }

    /// Suggested backoff; zero when the error is not retryable.
    pub fn retry_after(&self) -> Duration {
        match self {
            AtmError::Internal {
                retry: Retry::After(delay),
                ..
            } => *delay,
            _ => Duration::ZERO,
        }
    }
}
