//! `/favorites` routes. Every route requires an authenticated caller.

use crate::offer::{OfferRdo, OfferService};
use http::Method;
use sixcities_core::{AppError, RequestContext, StepResult};
use sixcities_middleware::{AuthGuard, Middleware};
use sixcities_server::{Controller, RouteError};
use std::sync::Arc;

use super::FavoriteService;

/// Handlers for listing, adding and removing favorites.
#[derive(Debug)]
pub struct FavoriteController {
    offers: Arc<OfferService>,
    favorites: Arc<FavoriteService>,
}

impl FavoriteController {
    /// Creates the controller.
    pub fn new(offers: Arc<OfferService>, favorites: Arc<FavoriteService>) -> Arc<Self> {
        Arc::new(Self { offers, favorites })
    }

    /// Registers the routes under `/favorites`.
    pub fn controller(self: &Arc<Self>) -> Result<Controller, RouteError> {
        let mut controller = Controller::new("/favorites");

        let this = Arc::clone(self);
        controller.add_route(
            Method::GET,
            "/",
            move |ctx| Box::pin(Arc::clone(&this).index(ctx)),
            vec![Arc::new(AuthGuard::new())],
        )?;

        let this = Arc::clone(self);
        controller.add_route(
            Method::POST,
            "/:offerId",
            move |ctx| Box::pin(Arc::clone(&this).add(ctx)),
            self.guards(),
        )?;

        let this = Arc::clone(self);
        controller.add_route(
            Method::DELETE,
            "/:offerId",
            move |ctx| Box::pin(Arc::clone(&this).remove(ctx)),
            self.guards(),
        )?;

        Ok(controller)
    }

    fn guards(&self) -> Vec<Arc<dyn Middleware>> {
        let mut guards: Vec<Arc<dyn Middleware>> = vec![Arc::new(AuthGuard::new())];
        guards.extend(crate::offer::offer_guards(&self.offers));
        guards
    }

    async fn index(self: Arc<Self>, ctx: &mut RequestContext) -> StepResult {
        let user_id = user_id(ctx)?;
        let ids = self.favorites.list(&user_id);
        let body: Vec<OfferRdo> = self
            .offers
            .find_many(&ids)
            .iter()
            .map(|offer| OfferRdo::from_offer(offer, true))
            .collect();
        Controller::ok(ctx, &body)?;
        Ok(())
    }

    async fn add(self: Arc<Self>, ctx: &mut RequestContext) -> StepResult {
        let user_id = user_id(ctx)?;
        let offer_id = ctx.param("offerId").unwrap_or_default().to_string();
        let offer = self.offers.find_by_id(&offer_id).ok_or_else(|| {
            AppError::not_found(format!("Offer with id {offer_id} not found"))
                .with_origin("FavoriteController")
        })?;

        self.favorites.add(&user_id, &offer_id);
        tracing::debug!(user_id = %user_id, offer_id = %offer_id, "favorite added");

        Controller::created(ctx, &OfferRdo::from_offer(&offer, true))?;
        Ok(())
    }

    async fn remove(self: Arc<Self>, ctx: &mut RequestContext) -> StepResult {
        let user_id = user_id(ctx)?;
        let offer_id = ctx.param("offerId").unwrap_or_default().to_string();

        self.favorites.remove(&user_id, &offer_id);
        tracing::debug!(user_id = %user_id, offer_id = %offer_id, "favorite removed");

        Controller::no_content(ctx);
        Ok(())
    }
}

fn user_id(ctx: &RequestContext) -> Result<String, AppError> {
    ctx.identity()
        .map(|identity| identity.id().to_string())
        .ok_or_else(|| {
            AppError::unauthorized("User is not authenticated").with_origin("FavoriteController")
        })
}
