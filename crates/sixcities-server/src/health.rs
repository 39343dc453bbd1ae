//! Liveness endpoint.

use crate::controller::Controller;
use http::Method;
use serde::Serialize;
use sixcities_router::RouteError;

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
}

/// A controller answering `GET /health` with `{"status":"ok"}`.
pub fn health_controller() -> Result<Controller, RouteError> {
    let mut controller = Controller::new("/health");
    controller.add_route(
        Method::GET,
        "/",
        |ctx| {
            Box::pin(async move {
                Controller::ok(
                    ctx,
                    &Health {
                        status: "ok",
                        version: env!("CARGO_PKG_VERSION"),
                    },
                )?;
                anyhow::Ok(())
            })
        },
        Vec::new(),
    )?;
    Ok(controller)
}
