//! Token service errors.

use thiserror::Error;

/// Errors produced by the [`TokenService`](crate::TokenService).
#[derive(Debug, Error)]
pub enum TokenError {
    /// The signing secret is empty. Fatal at startup.
    #[error("token signing secret is not configured")]
    MissingSecret,

    /// The claims could not be signed.
    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    /// The token is malformed, carries a bad signature, or has expired.
    #[error("invalid token: {reason}")]
    InvalidToken {
        /// Diagnostic reason, never shown to callers.
        reason: String,
    },
}

impl TokenError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidToken {
            reason: reason.into(),
        }
    }

    /// Returns `true` for a verification failure (as opposed to a key problem).
    #[must_use]
    pub const fn is_invalid_token(&self) -> bool {
        matches!(self, Self::InvalidToken { .. })
    }
}
