//! The exception filter: the single place failures become responses.

use sixcities_core::{AppError, Reply, RequestContext};

/// Turns a failed chain into exactly one response and logs the failure.
///
/// Client errors are logged at `warn`, server errors at `error` together
/// with their source chain. The filter never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExceptionFilter;

impl ExceptionFilter {
    /// Creates the filter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Formats `error` as `{ "error": message }` with its status.
    pub fn catch(&self, ctx: &RequestContext, error: &AppError) -> Reply {
        let status = error.status().as_u16();

        if error.is_server_error() {
            let cause = std::error::Error::source(error)
                .map(|source| format!("{source:#}"))
                .unwrap_or_default();
            tracing::error!(
                request_id = %ctx.request_id(),
                method = %ctx.method(),
                path = ctx.path(),
                status,
                origin = error.origin(),
                cause = %cause,
                "[{}] {}",
                error.origin(),
                error.message()
            );
        } else {
            tracing::warn!(
                request_id = %ctx.request_id(),
                method = %ctx.method(),
                path = ctx.path(),
                status,
                origin = error.origin(),
                "[{}] {}",
                error.origin(),
                error.message()
            );
        }

        Reply::from_error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::StatusCode;

    fn ctx() -> RequestContext {
        RequestContext::from_request(
            http::Request::builder().uri("/offers").body(Bytes::new()).unwrap(),
        )
    }

    #[test]
    fn test_client_error_reply() {
        let err = AppError::unauthorized("Invalid token").with_origin("IdentityMiddleware");
        let reply = ExceptionFilter::new().catch(&ctx(), &err);

        assert_eq!(reply.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = serde_json::from_slice(reply.body()).unwrap();
        assert_eq!(body, serde_json::json!({"error": "Invalid token"}));
    }

    #[test]
    fn test_server_error_hides_cause() {
        let err = AppError::wrap_unexpected(anyhow::anyhow!("connection refused"))
            .with_origin("GET /offers");
        let reply = ExceptionFilter::new().catch(&ctx(), &err);

        assert_eq!(reply.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = serde_json::from_slice(reply.body()).unwrap();
        assert_eq!(body["error"], "Internal error");
    }
}
