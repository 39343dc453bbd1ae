//! In-memory offer store.

use super::dto::{CreateOfferDto, UpdateOfferDto};
use super::types::{Amenity, City, HousingType};
use crate::ids::new_id;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use sixcities_core::{AppError, AppResult, BoxFuture};
use sixcities_middleware::DocumentExists;

/// A stored offer.
#[derive(Debug, Clone, PartialEq)]
pub struct Offer {
    /// Entity id.
    pub id: String,
    /// Unique title.
    pub title: String,
    /// Long description.
    pub description: String,
    /// Publication time.
    pub post_date: DateTime<Utc>,
    /// City.
    pub city: City,
    /// Preview image URL.
    pub preview_image: String,
    /// Gallery image URLs.
    pub images: Vec<String>,
    /// Premium placement.
    pub is_premium: bool,
    /// Average rating.
    pub rating: f64,
    /// Housing kind.
    pub housing_type: HousingType,
    /// Rooms.
    pub rooms_cnt: u32,
    /// Guests.
    pub people_cnt: u32,
    /// Price per night.
    pub price: u32,
    /// Amenities.
    pub amenities: Vec<Amenity>,
    /// Id of the user who published it.
    pub author_id: String,
    /// Number of comments.
    pub comments_cnt: u32,
    /// Latitude.
    pub latitude: f64,
    /// Longitude.
    pub longitude: f64,
}

/// Offers, newest first.
#[derive(Debug, Default)]
pub struct OfferService {
    offers: RwLock<Vec<Offer>>,
}

impl OfferService {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new offer published by `author_id`.
    ///
    /// # Errors
    ///
    /// 422 when another offer already has the title.
    pub fn create(&self, dto: CreateOfferDto, author_id: &str) -> AppResult<Offer> {
        let mut offers = self.offers.write();
        let title = dto.title.trim();
        if offers.iter().any(|o| o.title == title) {
            return Err(duplicate_title(title));
        }

        let offer = Offer {
            id: new_id(),
            title: dto.title.trim().to_string(),
            description: dto.description,
            post_date: Utc::now(),
            city: dto.city,
            preview_image: dto.preview_image,
            images: dto.images,
            is_premium: dto.is_premium,
            rating: 0.0,
            housing_type: dto.housing_type,
            rooms_cnt: dto.rooms_cnt,
            people_cnt: dto.people_cnt,
            price: dto.price,
            amenities: dto.amenities,
            author_id: author_id.to_string(),
            comments_cnt: 0,
            latitude: dto.latitude,
            longitude: dto.longitude,
        };
        offers.insert(0, offer.clone());
        tracing::debug!(offer_id = %offer.id, "offer created");
        Ok(offer)
    }

    /// Up to `limit` offers, newest first.
    pub fn find(&self, limit: usize) -> Vec<Offer> {
        self.offers.read().iter().take(limit).cloned().collect()
    }

    /// The offer with `id`.
    pub fn find_by_id(&self, id: &str) -> Option<Offer> {
        self.offers.read().iter().find(|o| o.id == id).cloned()
    }

    /// Offers with the given ids, in the order of `ids`; unknown ids are skipped.
    pub fn find_many(&self, ids: &[String]) -> Vec<Offer> {
        let offers = self.offers.read();
        ids.iter()
            .filter_map(|id| offers.iter().find(|o| &o.id == id).cloned())
            .collect()
    }

    /// Whether an offer with `id` exists.
    pub fn contains(&self, id: &str) -> bool {
        self.offers.read().iter().any(|o| o.id == id)
    }

    /// Applies the fields present in `dto`.
    ///
    /// # Errors
    ///
    /// 404 for an unknown `id`, 422 when the new title belongs to another
    /// offer.
    pub fn update(&self, id: &str, dto: UpdateOfferDto) -> AppResult<Offer> {
        let mut offers = self.offers.write();
        if let Some(title) = dto.title.as_deref().map(str::trim) {
            if offers.iter().any(|o| o.id != id && o.title == title) {
                return Err(duplicate_title(title));
            }
        }
        let offer = offers
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| not_found(id))?;

        if let Some(title) = dto.title {
            offer.title = title.trim().to_string();
        }
        if let Some(description) = dto.description {
            offer.description = description;
        }
        if let Some(city) = dto.city {
            offer.city = city;
        }
        if let Some(preview_image) = dto.preview_image {
            offer.preview_image = preview_image;
        }
        if let Some(images) = dto.images {
            offer.images = images;
        }
        if let Some(is_premium) = dto.is_premium {
            offer.is_premium = is_premium;
        }
        if let Some(housing_type) = dto.housing_type {
            offer.housing_type = housing_type;
        }
        if let Some(rooms_cnt) = dto.rooms_cnt {
            offer.rooms_cnt = rooms_cnt;
        }
        if let Some(people_cnt) = dto.people_cnt {
            offer.people_cnt = people_cnt;
        }
        if let Some(price) = dto.price {
            offer.price = price;
        }
        if let Some(amenities) = dto.amenities {
            offer.amenities = amenities;
        }
        if let Some(latitude) = dto.latitude {
            offer.latitude = latitude;
        }
        if let Some(longitude) = dto.longitude {
            offer.longitude = longitude;
        }

        Ok(offer.clone())
    }

    /// Removes the offer; returns whether it existed.
    pub fn delete(&self, id: &str) -> bool {
        let mut offers = self.offers.write();
        let before = offers.len();
        offers.retain(|o| o.id != id);
        offers.len() != before
    }

    /// Up to `limit` premium offers in `city`, newest first.
    pub fn find_premium_by_city(&self, city: City, limit: usize) -> Vec<Offer> {
        self.offers
            .read()
            .iter()
            .filter(|o| o.is_premium && o.city == city)
            .take(limit)
            .cloned()
            .collect()
    }
}

fn duplicate_title(title: &str) -> AppError {
    AppError::unprocessable(format!("Offer with title \"{title}\" exists."))
        .with_origin("OfferService")
}

pub(crate) fn not_found(id: &str) -> AppError {
    AppError::not_found(format!("Offer with id {id} not found")).with_origin("OfferService")
}

impl DocumentExists for OfferService {
    fn exists_by_id<'a>(&'a self, id: &'a str) -> BoxFuture<'a, anyhow::Result<bool>> {
        Box::pin(async move { Ok(self.contains(id)) })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn dto(title: &str, city: City, is_premium: bool) -> CreateOfferDto {
        CreateOfferDto {
            title: title.to_string(),
            description: "Quiet place near the canal".to_string(),
            city,
            preview_image: "preview.jpg".to_string(),
            images: vec!["1.jpg".to_string(), "2.jpg".to_string()],
            is_premium,
            housing_type: HousingType::Apartment,
            rooms_cnt: 2,
            people_cnt: 4,
            price: 120,
            amenities: vec![Amenity::Breakfast, Amenity::Washer],
            latitude: 52.37,
            longitude: 4.89,
        }
    }

    #[test]
    fn test_create_and_find() {
        let service = OfferService::new();
        let first = service.create(dto("Canal loft", City::Amsterdam, false), "author").unwrap();
        let second = service.create(dto("Old town flat", City::Paris, true), "author").unwrap();

        let all = service.find(60);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, second.id);
        assert_eq!(service.find(1).len(), 1);
        assert_eq!(service.find_by_id(&first.id).unwrap().title, "Canal loft");
        let err = service
            .create(dto(" Canal loft ", City::Paris, false), "author")
            .unwrap_err();
        assert_eq!(err.status(), http::StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.message(), "Offer with title \"Canal loft\" exists.");
    }

    #[test]
    fn test_update_only_present_fields() {
        let service = OfferService::new();
        let offer = service.create(dto("Canal loft", City::Amsterdam, false), "author").unwrap();

        let updated = service
            .update(
                &offer.id,
                UpdateOfferDto {
                    price: Some(99),
                    ..UpdateOfferDto::default()
                },
            )
            .unwrap();

        assert_eq!(updated.price, 99);
        assert_eq!(updated.title, "Canal loft");
        let err = service.update("missing", UpdateOfferDto::default()).unwrap_err();
        assert_eq!(err.status(), http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_update_title_must_stay_unique() {
        let service = OfferService::new();
        service.create(dto("Canal loft", City::Amsterdam, false), "author").unwrap();
        let other = service.create(dto("Old town flat", City::Paris, false), "author").unwrap();

        let taken = UpdateOfferDto {
            title: Some("Canal loft".to_string()),
            ..UpdateOfferDto::default()
        };
        assert!(service.update(&other.id, taken).is_err());
        assert_eq!(service.find_by_id(&other.id).unwrap().title, "Old town flat");

        let own = UpdateOfferDto {
            title: Some(" Old town flat ".to_string()),
            ..UpdateOfferDto::default()
        };
        assert!(service.update(&other.id, own).is_ok());
    }

    #[test]
    fn test_concurrent_creates_keep_titles_unique() {
        let service = std::sync::Arc::new(OfferService::new());
        let barrier = std::sync::Arc::new(std::sync::Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = std::sync::Arc::clone(&service);
                let barrier = std::sync::Arc::clone(&barrier);
                std::thread::spawn(move || {
                    barrier.wait();
                    service.create(dto("Canal loft", City::Amsterdam, false), "author").is_ok()
                })
            })
            .collect();
        let created = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(created, 1);
        assert_eq!(service.find(usize::MAX).len(), 1);
    }

    #[test]
    fn test_premium_by_city_is_capped() {
        let service = OfferService::new();
        for n in 0..5 {
            service.create(dto(&format!("Premium {n}"), City::Hamburg, true), "author").unwrap();
        }
        service.create(dto("Plain", City::Hamburg, false), "author").unwrap();
        service.create(dto("Elsewhere", City::Paris, true), "author").unwrap();

        let premium = service.find_premium_by_city(City::Hamburg, 3);
        assert_eq!(premium.len(), 3);
        assert!(premium.iter().all(|o| o.is_premium && o.city == City::Hamburg));
    }

    #[test]
    fn test_delete() {
        let service = OfferService::new();
        let offer = service.create(dto("Canal loft", City::Amsterdam, false), "author").unwrap();

        assert!(service.delete(&offer.id));
        assert!(!service.delete(&offer.id));
        assert!(service.find_by_id(&offer.id).is_none());
    }

    #[tokio::test]
    async fn test_document_exists() {
        let service = OfferService::new();
        let offer = service.create(dto("Canal loft", City::Amsterdam, false), "author").unwrap();

        assert!(service.exists_by_id(&offer.id).await.unwrap());
        assert!(!service.exists_by_id("000000000000000000000000").await.unwrap());
    }
}
