//! Rental offers.

mod controller;
pub mod dto;
pub mod rdo;
mod service;
pub mod types;

pub use controller::OfferController;
pub(crate) use controller::offer_guards;
pub use dto::{CreateOfferDto, UpdateOfferDto};
pub use rdo::OfferRdo;
pub use service::{Offer, OfferService};
pub use types::{Amenity, City, HousingType};
