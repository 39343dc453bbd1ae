//! Required authentication.

use crate::middleware::Middleware;
use sixcities_core::{AppError, BoxFuture, RequestContext, StepResult};

/// Rejects requests that reached it without an identity.
///
/// Place after [`IdentityMiddleware`](super::IdentityMiddleware) (the
/// dispatcher does this for every route) and before any stage with side
/// effects, such as an upload.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthGuard;

impl AuthGuard {
    /// Creates the guard.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Middleware for AuthGuard {
    fn name(&self) -> &'static str {
        "AuthGuard"
    }

    fn execute<'a>(&'a self, ctx: &'a mut RequestContext) -> BoxFuture<'a, StepResult> {
        let result: StepResult = if ctx.identity().is_some() {
            Ok(())
        } else {
            Err(AppError::unauthorized("User is not authenticated")
                .with_origin(self.name())
                .into())
        };
        Box::pin(std::future::ready(result))
    }
}
