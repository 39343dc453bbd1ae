//! The application error type.
//!
//! [`AppError`] is the only structured failure allowed to cross component
//! boundaries. Each one carries the HTTP status it should be reported with,
//! a caller-facing message, and the name of the component that raised it.
//!
//! | Constructor        | Status |
//! |--------------------|--------|
//! | `bad_request`      | 400    |
//! | `unauthorized`     | 401    |
//! | `not_found`        | 404    |
//! | `conflict`         | 409    |
//! | `unprocessable`    | 422    |
//! | `internal`         | 500    |

use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use thiserror::Error;

/// Result alias using [`AppError`].
pub type AppResult<T> = Result<T, AppError>;

/// A failure with an HTTP status, message and origin.
///
/// # Example
///
/// ```
/// use sixcities_core::AppError;
/// use http::StatusCode;
///
/// let err = AppError::unauthorized("Invalid token").with_origin("IdentityMiddleware");
/// assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
/// assert_eq!(err.origin(), "IdentityMiddleware");
/// assert_eq!(err.to_envelope().error, "Invalid token");
/// ```
#[derive(Error, Debug)]
#[error("{message}")]
pub struct AppError {
    status: StatusCode,
    message: String,
    origin: Cow<'static, str>,
    /// Underlying cause, logged but never sent to the caller.
    #[source]
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Creates an error with an explicit status.
    ///
    /// Statuses outside 4xx/5xx are reported as 500.
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        let status = if status.is_client_error() || status.is_server_error() {
            status
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self {
            status,
            message: message.into(),
            origin: Cow::Borrowed(""),
            source: None,
        }
    }

    /// 400: malformed identifier or body.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// 401: missing, invalid or expired credentials.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// 404: the referenced entity or route does not exist.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// 409: uniqueness violation.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    /// 422: the entity cannot be created as submitted.
    #[must_use]
    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    /// 500: an unclassified fault.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Wraps an unexpected failure as `500 Internal error`.
    pub fn wrap_unexpected(source: impl Into<anyhow::Error>) -> Self {
        Self::internal("Internal error").with_source(source)
    }

    /// Sets the component that raised the error.
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<Cow<'static, str>>) -> Self {
        self.origin = origin.into();
        self
    }

    /// Sets the origin only if none was given.
    #[must_use]
    pub fn or_origin(self, origin: impl Into<Cow<'static, str>>) -> Self {
        if self.origin.is_empty() {
            self.with_origin(origin)
        } else {
            self
        }
    }

    /// Attaches the underlying cause.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// HTTP status to respond with.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Caller-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Name of the component that raised the error; empty if unknown.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// `true` for 5xx errors.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }

    /// The JSON body sent to the caller.
    #[must_use]
    pub fn to_envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            error: self.message.clone(),
        }
    }
}

/// Error response body: `{ "error": "<message>" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// The error message.
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_constructor_statuses() {
        assert_eq!(AppError::bad_request("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::unauthorized("x").status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::conflict("x").status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::unprocessable("x").status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::internal("x").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_non_error_status_becomes_500() {
        let err = AppError::new(StatusCode::OK, "weird");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_or_origin_keeps_existing() {
        let err = AppError::not_found("gone").with_origin("DocumentExists");
        assert_eq!(err.or_origin("Dispatcher").origin(), "DocumentExists");

        let err = AppError::not_found("gone");
        assert_eq!(err.or_origin("Dispatcher").origin(), "Dispatcher");
    }

    #[test]
    fn test_wrap_unexpected_hides_cause() {
        let err = AppError::wrap_unexpected(anyhow::anyhow!("disk on fire"));

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Internal error");
        assert_eq!(err.to_envelope().error, "Internal error");
        assert_eq!(err.source().unwrap().to_string(), "disk on fire");
    }

    #[test]
    fn test_travels_through_anyhow() {
        fn step() -> anyhow::Result<()> {
            Err(AppError::conflict("User with email «a@b.c» exists."))?
        }

        let err = step().unwrap_err().downcast::<AppError>().unwrap();
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_envelope_serialization() {
        let json = serde_json::to_string(&AppError::bad_request("offerId is invalid").to_envelope())
            .unwrap();
        assert_eq!(json, r#"{"error":"offerId is invalid"}"#);
    }
}
