//! In-memory favorites store.

use parking_lot::RwLock;
use std::collections::HashMap;

/// Per-user favorite offer ids, in the order they were added.
#[derive(Debug, Default)]
pub struct FavoriteService {
    entries: RwLock<HashMap<String, Vec<String>>>,
}

impl FavoriteService {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `offer_id` as a favorite of `user_id`. Adding twice is a no-op.
    pub fn add(&self, user_id: &str, offer_id: &str) {
        let mut entries = self.entries.write();
        let offers = entries.entry(user_id.to_string()).or_default();
        if !offers.iter().any(|id| id == offer_id) {
            offers.push(offer_id.to_string());
        }
    }

    /// Unmarks `offer_id`; returns whether it was marked.
    pub fn remove(&self, user_id: &str, offer_id: &str) -> bool {
        let mut entries = self.entries.write();
        let Some(offers) = entries.get_mut(user_id) else {
            return false;
        };
        let before = offers.len();
        offers.retain(|id| id != offer_id);
        offers.len() != before
    }

    /// Whether `offer_id` is a favorite of `user_id`.
    pub fn is_favorite(&self, user_id: &str, offer_id: &str) -> bool {
        self.entries
            .read()
            .get(user_id)
            .is_some_and(|offers| offers.iter().any(|id| id == offer_id))
    }

    /// Favorite offer ids of `user_id`.
    pub fn list(&self, user_id: &str) -> Vec<String> {
        self.entries.read().get(user_id).cloned().unwrap_or_default()
    }

    /// Drops `offer_id` from every user's favorites.
    pub fn forget_offer(&self, offer_id: &str) {
        for offers in self.entries.write().values_mut() {
            offers.retain(|id| id != offer_id);
        }
    }
}
