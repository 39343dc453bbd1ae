//! Controllers: named groups of routes mounted under a path prefix.
//!
//! Routes are registered imperatively with [`Controller::add_route`]. Each
//! route binds a method and path template to a handler and an ordered list of
//! middlewares; the list order is the execution order.
//!
//! ```rust
//! use http::Method;
//! use serde_json::json;
//! use sixcities_server::Controller;
//!
//! let mut users = Controller::new("/users");
//! users
//!     .add_route(
//!         Method::GET,
//!         "/ping",
//!         |ctx| {
//!             Box::pin(async move {
//!                 Controller::ok(ctx, &json!({"pong": true}))?;
//!                 anyhow::Ok(())
//!             })
//!         },
//!         Vec::new(),
//!     )
//!     .unwrap();
//!
//! assert_eq!(users.routes()[0].template().as_str(), "/users/ping");
//! ```

use http::{Method, StatusCode};
use serde::Serialize;
use sixcities_core::{AppResult, BoxFuture, Reply, RequestContext, StepResult};
use sixcities_middleware::Middleware;
use sixcities_router::{PathTemplate, RouteError};
use std::fmt;
use std::sync::Arc;

/// A type-erased route handler.
pub type Handler =
    Arc<dyn for<'a> Fn(&'a mut RequestContext) -> BoxFuture<'a, StepResult> + Send + Sync>;

/// A registered route.
#[derive(Clone)]
pub struct Route {
    method: Method,
    template: PathTemplate,
    handler: Handler,
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl Route {
    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Full path template, prefix included.
    #[must_use]
    pub const fn template(&self) -> &PathTemplate {
        &self.template
    }

    /// Route middlewares in execution order.
    #[must_use]
    pub fn middlewares(&self) -> &[Arc<dyn Middleware>] {
        &self.middlewares
    }

    /// Names of the route middlewares in execution order.
    #[must_use]
    pub fn middleware_names(&self) -> Vec<&'static str> {
        self.middlewares.iter().map(|m| m.name()).collect()
    }

    pub(crate) fn handler(&self) -> &Handler {
        &self.handler
    }

    /// `"<METHOD> <template>"`, used as the origin of handler failures.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {}", self.method, self.template)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("template", &self.template.as_str())
            .field("middlewares", &self.middleware_names())
            .finish_non_exhaustive()
    }
}

/// A group of routes sharing a path prefix.
#[derive(Debug, Clone)]
pub struct Controller {
    prefix: String,
    routes: Vec<Route>,
}

impl Controller {
    /// Creates an empty controller mounted at `prefix`.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            routes: Vec::new(),
        }
    }

    /// Mount prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Registers a route.
    ///
    /// # Errors
    ///
    /// [`RouteError::Duplicate`] when this controller already has a route with
    /// the same method and path shape; [`RouteError::InvalidTemplate`] when
    /// `path` does not parse.
    pub fn add_route<F>(
        &mut self,
        method: Method,
        path: &str,
        handler: F,
        middlewares: Vec<Arc<dyn Middleware>>,
    ) -> Result<&mut Self, RouteError>
    where
        F: for<'a> Fn(&'a mut RequestContext) -> BoxFuture<'a, StepResult>
            + Send
            + Sync
            + 'static,
    {
        let full = PathTemplate::join(&self.prefix, path);
        let template = PathTemplate::parse(&full)?;

        if let Some(existing) = self
            .routes
            .iter()
            .find(|r| r.method == method && r.template.same_shape(&template))
        {
            return Err(RouteError::Duplicate {
                method,
                path: full,
                existing: existing.template.as_str().to_string(),
            });
        }

        self.routes.push(Route {
            method,
            template,
            handler: Arc::new(handler),
            middlewares,
        });
        Ok(self)
    }

    /// The registered routes, in registration order.
    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub(crate) fn into_routes(self) -> Vec<Route> {
        self.routes
    }

    /// Responds `200 OK` with `payload` as JSON.
    pub fn ok<T: Serialize + ?Sized>(ctx: &mut RequestContext, payload: &T) -> AppResult<()> {
        ctx.respond_json(StatusCode::OK, payload)
    }

    /// Responds `201 Created` with `payload` as JSON.
    pub fn created<T: Serialize + ?Sized>(ctx: &mut RequestContext, payload: &T) -> AppResult<()> {
        ctx.respond_json(StatusCode::CREATED, payload)
    }

    /// Responds `204 No Content`.
    pub fn no_content(ctx: &mut RequestContext) {
        ctx.respond(Reply::empty(StatusCode::NO_CONTENT));
    }
}
