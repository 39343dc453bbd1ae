//! Optional identity attachment.
//!
//! Runs for every request before any route middleware. A request without a
//! bearer credential continues as anonymous; a request with a credential that
//! fails verification is rejected. An expired token is a failed credential,
//! not a missing one.

use crate::middleware::Middleware;
use sixcities_auth::TokenService;
use sixcities_core::{AppError, BoxFuture, RequestContext, StepResult};
use std::sync::Arc;

/// Request header carrying the credential.
pub const AUTHORIZATION_HEADER: &str = "authorization";

/// Attaches the caller [`Identity`](sixcities_auth::Identity) when a valid
/// token is presented.
///
/// The token is the second whitespace-separated word of the `Authorization`
/// header (`Bearer <token>`).
#[derive(Debug, Clone)]
pub struct IdentityMiddleware {
    tokens: Arc<TokenService>,
}

impl IdentityMiddleware {
    /// Creates the middleware around a shared token service.
    #[must_use]
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }

    fn invalid_token(&self) -> AppError {
        AppError::unauthorized("Invalid token").with_origin(self.name())
    }

    async fn attach(&self, ctx: &mut RequestContext) -> StepResult {
        let Some(value) = ctx.headers().get(AUTHORIZATION_HEADER) else {
            return Ok(());
        };
        let header = value.to_str().map_err(|_| self.invalid_token())?;

        let Some(token) = header.split_whitespace().nth(1) else {
            return Ok(());
        };

        match self.tokens.verify(token) {
            Ok(claims) => {
                let identity = claims.identity();
                tracing::debug!(
                    request_id = %ctx.request_id(),
                    user_id = identity.id(),
                    "caller identified"
                );
                ctx.set_identity(identity);
                Ok(())
            }
            Err(err) => {
                tracing::debug!(request_id = %ctx.request_id(), error = %err, "token rejected");
                Err(self.invalid_token().into())
            }
        }
    }
}

impl Middleware for IdentityMiddleware {
    fn name(&self) -> &'static str {
        "IdentityMiddleware"
    }

    fn execute<'a>(&'a self, ctx: &'a mut RequestContext) -> BoxFuture<'a, StepResult> {
        Box::pin(self.attach(ctx))
    }
}
