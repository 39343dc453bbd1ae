//! `GET /static/:filename`: serves uploaded files back out of the upload directory.

use crate::storage::{content_type_for, DiskFileStorage};
use http::{Method, StatusCode};
use sixcities_core::{AppError, Reply, RequestContext, StepResult};
use sixcities_server::{Controller, RouteError};
use std::sync::Arc;

const FILENAME: &str = "filename";

/// Reads files written by [`DiskFileStorage`]. Only names the storage hands
/// out are served, so the route never leaves the upload directory.
#[derive(Debug)]
pub struct StaticController {
    storage: Arc<DiskFileStorage>,
}

impl StaticController {
    /// Creates the controller over `storage`.
    pub fn new(storage: Arc<DiskFileStorage>) -> Arc<Self> {
        Arc::new(Self { storage })
    }

    /// Registers the route under `/static`.
    pub fn controller(self: &Arc<Self>) -> Result<Controller, RouteError> {
        let mut controller = Controller::new("/static");

        let this = Arc::clone(self);
        controller.add_route(
            Method::GET,
            "/:filename",
            move |ctx| Box::pin(Arc::clone(&this).show(ctx)),
            Vec::new(),
        )?;

        Ok(controller)
    }

    async fn show(self: Arc<Self>, ctx: &mut RequestContext) -> StepResult {
        let name = ctx.param(FILENAME).unwrap_or_default().to_string();
        let data = self
            .storage
            .read(&name)
            .await
            .map_err(|e| AppError::wrap_unexpected(e).with_origin("StaticController"))?
            .ok_or_else(|| {
                AppError::not_found(format!("File {name} not found")).with_origin("StaticController")
            })?;

        tracing::debug!(file = %name, size = data.len(), "serving upload");
        ctx.respond(Reply::bytes(StatusCode::OK, content_type_for(&name), data));
        Ok(())
    }
}
