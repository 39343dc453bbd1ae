//! Offer request payloads.
//!
//! Field names mirror the JSON payload and are left undocumented.

#![allow(missing_docs)]

use super::types::{Amenity, City, HousingType};
use serde::Deserialize;
use sixcities_core::{AppError, AppResult};

/// Body of `POST /offers`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOfferDto {
    pub title: String,
    pub description: String,
    pub city: City,
    pub preview_image: String,
    pub images: Vec<String>,
    #[serde(default)]
    pub is_premium: bool,
    #[serde(rename = "type")]
    pub housing_type: HousingType,
    pub rooms_cnt: u32,
    pub people_cnt: u32,
    pub price: u32,
    #[serde(default)]
    pub amenities: Vec<Amenity>,
    pub latitude: f64,
    pub longitude: f64,
}

impl CreateOfferDto {
    /// Rejects values the type system allows but the domain does not.
    pub fn validate(&self) -> AppResult<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::bad_request("title must not be empty"));
        }
        check_coordinates(self.latitude, self.longitude)
    }
}

/// Body of `PATCH /offers/:offerId`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOfferDto {
    pub title: Option<String>,
    pub description: Option<String>,
    pub city: Option<City>,
    pub preview_image: Option<String>,
    pub images: Option<Vec<String>>,
    pub is_premium: Option<bool>,
    #[serde(rename = "type")]
    pub housing_type: Option<HousingType>,
    pub rooms_cnt: Option<u32>,
    pub people_cnt: Option<u32>,
    pub price: Option<u32>,
    pub amenities: Option<Vec<Amenity>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl UpdateOfferDto {
    /// Rejects values the type system allows but the domain does not.
    pub fn validate(&self) -> AppResult<()> {
        if self.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(AppError::bad_request("title must not be empty"));
        }
        check_coordinates(self.latitude.unwrap_or(0.0), self.longitude.unwrap_or(0.0))
    }
}

fn check_coordinates(latitude: f64, longitude: f64) -> AppResult<()> {
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(AppError::bad_request("coordinates are out of range"));
    }
    Ok(())
}

/// Query of `GET /offers`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ListQuery {
    /// Maximum number of offers; defaults to [`DEFAULT_OFFER_COUNT`].
    pub limit: Option<usize>,
}

/// Page size of `GET /offers` when no limit is given.
pub const DEFAULT_OFFER_COUNT: usize = 60;

/// Premium offers returned per city.
pub const PREMIUM_OFFER_COUNT: usize = 3;
