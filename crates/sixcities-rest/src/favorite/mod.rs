//! Favorite offers of a user.

mod controller;
mod service;

pub use controller::FavoriteController;
pub use service::FavoriteService;
