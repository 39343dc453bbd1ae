//! Offer response projection.
//!
//! Field names mirror the JSON payload and are left undocumented.

#![allow(missing_docs)]

use super::service::Offer;
use super::types::{City, HousingType};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Public view of an offer in listings and detail responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferRdo {
    pub id: String,
    pub title: String,
    pub post_date: DateTime<Utc>,
    pub city: City,
    pub preview_image: String,
    pub is_premium: bool,
    pub is_favorite: bool,
    pub rating: f64,
    #[serde(rename = "type")]
    pub housing_type: HousingType,
    pub price: u32,
    pub comments_cnt: u32,
}

impl OfferRdo {
    /// Projects `offer`; `is_favorite` is relative to the caller.
    pub fn from_offer(offer: &Offer, is_favorite: bool) -> Self {
        Self {
            id: offer.id.clone(),
            title: offer.title.clone(),
            post_date: offer.post_date,
            city: offer.city,
            preview_image: offer.preview_image.clone(),
            is_premium: offer.is_premium,
            is_favorite,
            rating: offer.rating,
            housing_type: offer.housing_type,
            price: offer.price,
            comments_cnt: offer.comments_cnt,
        }
    }
}
