//! The middleware trait.
//!
//! A middleware is one step of a route's chain. The dispatcher awaits each
//! step in order; returning an error stops the chain and hands the error to
//! the exception filter.
//!
//! # Example
//!
//! ```
//! use sixcities_core::{AppError, BoxFuture, RequestContext, StepResult};
//! use sixcities_middleware::Middleware;
//!
//! struct RequireJson;
//!
//! impl Middleware for RequireJson {
//!     fn name(&self) -> &'static str {
//!         "RequireJson"
//!     }
//!
//!     fn execute<'a>(&'a self, ctx: &'a mut RequestContext) -> BoxFuture<'a, StepResult> {
//!         Box::pin(async move {
//!             if ctx.header("content-type") != Some("application/json") {
//!                 Err(AppError::bad_request("Expected JSON").with_origin(self.name()))?;
//!             }
//!             anyhow::Ok(())
//!         })
//!     }
//! }
//! ```

use sixcities_core::{BoxFuture, RequestContext, StepResult};

/// One step of a request chain.
///
/// Implementations hold only constructor-injected collaborators and keep no
/// per-request state.
pub trait Middleware: Send + Sync + 'static {
    /// Name used as the error origin and in logs.
    fn name(&self) -> &'static str;

    /// Runs the step. `Ok(())` continues the chain.
    fn execute<'a>(&'a self, ctx: &'a mut RequestContext) -> BoxFuture<'a, StepResult>;
}

/// A middleware built from a closure.
///
/// ```
/// use sixcities_middleware::{FnMiddleware, Middleware};
///
/// let noop = FnMiddleware::new("noop", |_ctx| Box::pin(async { anyhow::Ok(()) }));
/// assert_eq!(noop.name(), "noop");
/// ```
pub struct FnMiddleware<F> {
    name: &'static str,
    func: F,
}

impl<F> FnMiddleware<F>
where
    F: for<'a> Fn(&'a mut RequestContext) -> BoxFuture<'a, StepResult> + Send + Sync + 'static,
{
    /// Creates a middleware that calls `func`.
    pub const fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

impl<F> Middleware for FnMiddleware<F>
where
    F: for<'a> Fn(&'a mut RequestContext) -> BoxFuture<'a, StepResult> + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn execute<'a>(&'a self, ctx: &'a mut RequestContext) -> BoxFuture<'a, StepResult> {
        (self.func)(ctx)
    }
}
