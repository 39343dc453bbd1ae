//! Request dispatch.
//!
//! For each request the dispatcher:
//!
//! 1. runs the global middlewares (the identity stage) in order,
//! 2. matches the route, answering 404 when nothing matches,
//! 3. runs the route's middlewares in registration order,
//! 4. runs the handler, which must write a response.
//!
//! The first failure stops the chain. An [`AppError`] is passed to the
//! [`ExceptionFilter`] as raised; any other error becomes
//! `500 Internal error` with the failing component as origin.

use crate::controller::{Controller, Route};
use crate::filter::ExceptionFilter;
use bytes::Bytes;
use http::HeaderValue;
use sixcities_core::{AppError, Reply, RequestContext, Response};
use sixcities_middleware::Middleware;
use sixcities_router::{RouteError, RouteTable};
use std::fmt;
use std::sync::Arc;

/// Response header echoing the request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Runs middleware chains and handlers for mounted routes.
pub struct Dispatcher {
    global: Vec<Arc<dyn Middleware>>,
    routes: RouteTable<Arc<Route>>,
    filter: ExceptionFilter,
}

impl Dispatcher {
    /// Starts a builder.
    #[must_use]
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::default()
    }

    /// Handles one fully read request.
    pub async fn dispatch(&self, request: http::Request<Bytes>) -> Response {
        let mut ctx = RequestContext::from_request(request);

        let reply = match self.run_chain(&mut ctx).await {
            Ok(()) => ctx.reply().cloned(),
            Err(error) => Some(self.filter.catch(&ctx, &error)),
        }
        .unwrap_or_else(|| Reply::from_error(&AppError::internal("Internal error")));

        tracing::info!(
            request_id = %ctx.request_id(),
            method = %ctx.method(),
            path = ctx.path(),
            status = reply.status().as_u16(),
            duration_ms = u64::try_from(ctx.elapsed().as_millis()).unwrap_or(u64::MAX),
            "request completed"
        );

        let request_id = ctx.request_id().to_string();
        let mut response = reply.into_response();
        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        response
    }

    async fn run_chain(&self, ctx: &mut RequestContext) -> Result<(), AppError> {
        for middleware in &self.global {
            run_step(middleware.as_ref(), ctx).await?;
        }

        let route = {
            let Some(found) = self.routes.lookup(ctx.method(), ctx.path()) else {
                return Err(AppError::not_found(format!(
                    "Route {} {} not found",
                    ctx.method(),
                    ctx.path()
                ))
                .with_origin("Dispatcher"));
            };
            let route = Arc::clone(found.value);
            ctx.set_params(found.params);
            route
        };

        for middleware in route.middlewares() {
            run_step(middleware.as_ref(), ctx).await?;
        }

        let outcome = (route.handler())(ctx).await;
        if let Err(err) = outcome {
            if ctx.is_responded() {
                tracing::warn!(
                    request_id = %ctx.request_id(),
                    route = %route.label(),
                    "handler failed after writing a response; sending the error instead"
                );
            }
            return Err(classify(err, route.label()));
        }

        if !ctx.is_responded() {
            return Err(AppError::internal("Internal error")
                .with_origin(route.label())
                .with_source(anyhow::anyhow!("handler returned without writing a response")));
        }
        Ok(())
    }

    /// Registered routes in mount order.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter().map(|(_, _, route)| route.as_ref())
    }

    /// Names of the global middlewares in execution order.
    #[must_use]
    pub fn global_middleware_names(&self) -> Vec<&'static str> {
        self.global.iter().map(|m| m.name()).collect()
    }
}

async fn run_step(middleware: &dyn Middleware, ctx: &mut RequestContext) -> Result<(), AppError> {
    middleware
        .execute(ctx)
        .await
        .map_err(|err| classify(err, middleware.name()))
}

fn classify(err: anyhow::Error, origin: impl Into<String>) -> AppError {
    let origin = origin.into();
    match err.downcast::<AppError>() {
        Ok(app) => app.or_origin(origin),
        Err(other) => AppError::wrap_unexpected(other).with_origin(origin),
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("global", &self.global_middleware_names())
            .field("routes", &self.routes.len())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Dispatcher`].
#[derive(Default)]
pub struct DispatcherBuilder {
    global: Vec<Arc<dyn Middleware>>,
    routes: RouteTable<Arc<Route>>,
    filter: ExceptionFilter,
}

impl DispatcherBuilder {
    /// Adds a middleware that runs for every request, before route matching.
    #[must_use]
    pub fn global(mut self, middleware: impl Middleware) -> Self {
        self.global.push(Arc::new(middleware));
        self
    }

    /// Mounts every route of `controller`.
    ///
    /// # Errors
    ///
    /// [`RouteError::Duplicate`] if a route collides with one already mounted.
    pub fn mount(mut self, controller: Controller) -> Result<Self, RouteError> {
        let prefix = controller.prefix().to_string();
        for route in controller.into_routes() {
            let method = route.method().clone();
            let path = route.template().as_str().to_string();
            self.routes.insert(method, &path, Arc::new(route))?;
        }
        tracing::debug!(prefix = %prefix, "controller mounted");
        Ok(self)
    }

    /// Replaces the exception filter.
    #[must_use]
    pub fn filter(mut self, filter: ExceptionFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Finishes the dispatcher.
    #[must_use]
    pub fn build(self) -> Dispatcher {
        Dispatcher {
            global: self.global,
            routes: self.routes,
            filter: self.filter,
        }
    }
}

impl fmt::Debug for DispatcherBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatcherBuilder")
            .field("global", &self.global.len())
            .field("routes", &self.routes.len())
            .finish_non_exhaustive()
    }
}
