//! `/offers` routes.

use super::dto::{ListQuery, DEFAULT_OFFER_COUNT, PREMIUM_OFFER_COUNT};
use super::service::not_found;
use super::{City, CreateOfferDto, Offer, OfferRdo, OfferService, UpdateOfferDto};
use crate::favorite::FavoriteService;
use http::Method;
use sixcities_core::{AppError, RequestContext, StepResult};
use sixcities_middleware::{
    DocumentExists, DocumentExistsMiddleware, Middleware, ValidateObjectIdMiddleware,
};
use sixcities_server::{Controller, RouteError};
use std::sync::Arc;

const OFFER_ID: &str = "offerId";

/// Handlers for offer listing, detail and CRUD.
#[derive(Debug)]
pub struct OfferController {
    offers: Arc<OfferService>,
    favorites: Arc<FavoriteService>,
    anonymous_id: String,
}

impl OfferController {
    /// `anonymous_id` is the user unauthenticated callers act as.
    pub fn new(
        offers: Arc<OfferService>,
        favorites: Arc<FavoriteService>,
        anonymous_id: impl Into<String>,
    ) -> Arc<Self> {
        Arc::new(Self {
            offers,
            favorites,
            anonymous_id: anonymous_id.into(),
        })
    }

    /// Registers the routes under `/offers`.
    pub fn controller(self: &Arc<Self>) -> Result<Controller, RouteError> {
        let mut controller = Controller::new("/offers");

        let this = Arc::clone(self);
        controller.add_route(
            Method::GET,
            "/",
            move |ctx| Box::pin(Arc::clone(&this).index(ctx)),
            Vec::new(),
        )?;

        let this = Arc::clone(self);
        controller.add_route(
            Method::POST,
            "/",
            move |ctx| Box::pin(Arc::clone(&this).create(ctx)),
            Vec::new(),
        )?;

        let this = Arc::clone(self);
        controller.add_route(
            Method::GET,
            "/premium/:city",
            move |ctx| Box::pin(Arc::clone(&this).premium(ctx)),
            Vec::new(),
        )?;

        let this = Arc::clone(self);
        controller.add_route(
            Method::GET,
            "/:offerId",
            move |ctx| Box::pin(Arc::clone(&this).show(ctx)),
            self.offer_guards(),
        )?;

        let this = Arc::clone(self);
        controller.add_route(
            Method::PATCH,
            "/:offerId",
            move |ctx| Box::pin(Arc::clone(&this).update(ctx)),
            self.offer_guards(),
        )?;

        let this = Arc::clone(self);
        controller.add_route(
            Method::DELETE,
            "/:offerId",
            move |ctx| Box::pin(Arc::clone(&this).delete(ctx)),
            self.offer_guards(),
        )?;

        Ok(controller)
    }

    fn offer_guards(&self) -> Vec<Arc<dyn Middleware>> {
        offer_guards(&self.offers)
    }

    fn project(&self, ctx: &RequestContext, offers: &[Offer]) -> Vec<OfferRdo> {
        let caller = ctx.caller_id(&self.anonymous_id);
        offers
            .iter()
            .map(|offer| OfferRdo::from_offer(offer, self.favorites.is_favorite(caller, &offer.id)))
            .collect()
    }

    async fn index(self: Arc<Self>, ctx: &mut RequestContext) -> StepResult {
        let query: ListQuery = ctx.query()?;
        let offers = self.offers.find(query.limit.unwrap_or(DEFAULT_OFFER_COUNT));
        let body = self.project(ctx, &offers);
        Controller::ok(ctx, &body)?;
        Ok(())
    }

    async fn create(self: Arc<Self>, ctx: &mut RequestContext) -> StepResult {
        let dto: CreateOfferDto = ctx.json()?;
        dto.validate()?;

        let author = ctx.caller_id(&self.anonymous_id).to_string();
        let offer = self.offers.create(dto, &author)?;
        tracing::info!(offer_id = %offer.id, author_id = %author, "offer published");

        let body = OfferRdo::from_offer(&offer, false);
        Controller::created(ctx, &body)?;
        Ok(())
    }

    async fn show(self: Arc<Self>, ctx: &mut RequestContext) -> StepResult {
        let offer = self.require(ctx)?;
        let body = self.project(ctx, std::slice::from_ref(&offer));
        Controller::ok(ctx, &body[0])?;
        Ok(())
    }

    async fn update(self: Arc<Self>, ctx: &mut RequestContext) -> StepResult {
        let dto: UpdateOfferDto = ctx.json()?;
        dto.validate()?;

        let id = param(ctx)?;
        let offer = self.offers.update(&id, dto)?;
        let body = self.project(ctx, std::slice::from_ref(&offer));
        Controller::ok(ctx, &body[0])?;
        Ok(())
    }

    async fn delete(self: Arc<Self>, ctx: &mut RequestContext) -> StepResult {
        let id = param(ctx)?;
        if !self.offers.delete(&id) {
            return Err(not_found(&id).into());
        }
        self.favorites.forget_offer(&id);
        tracing::info!(offer_id = %id, "offer deleted");

        Controller::no_content(ctx);
        Ok(())
    }

    async fn premium(self: Arc<Self>, ctx: &mut RequestContext) -> StepResult {
        let raw = ctx.param("city").unwrap_or_default();
        let city: City = raw
            .parse()
            .map_err(|e: super::types::UnknownCity| AppError::bad_request(e.to_string()))?;

        let offers = self.offers.find_premium_by_city(city, PREMIUM_OFFER_COUNT);
        let body = self.project(ctx, &offers);
        Controller::ok(ctx, &body)?;
        Ok(())
    }

    fn require(&self, ctx: &RequestContext) -> Result<Offer, AppError> {
        let id = param(ctx)?;
        self.offers.find_by_id(&id).ok_or_else(|| not_found(&id))
    }
}

/// Format and existence guards for routes addressing one offer.
pub(crate) fn offer_guards(offers: &Arc<OfferService>) -> Vec<Arc<dyn Middleware>> {
    vec![
        Arc::new(ValidateObjectIdMiddleware::new(OFFER_ID)),
        Arc::new(DocumentExistsMiddleware::new(
            Arc::clone(offers) as Arc<dyn DocumentExists>,
            "Offer",
            OFFER_ID,
        )),
    ]
}

fn param(ctx: &RequestContext) -> Result<String, AppError> {
    ctx.param(OFFER_ID)
        .map(str::to_string)
        .ok_or_else(|| AppError::bad_request(format!("{OFFER_ID} is invalid")))
}

