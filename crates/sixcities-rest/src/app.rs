//! Composition root: builds services from configuration and wires them into
//! a [`Dispatcher`].

use crate::favorite::{FavoriteController, FavoriteService};
use crate::offer::{OfferController, OfferService};
use crate::static_files::StaticController;
use crate::storage::DiskFileStorage;
use crate::user::{UserController, UserService};
use anyhow::Context;
use sixcities_auth::TokenService;
use sixcities_config::AppConfig;
use sixcities_middleware::{FileStorage, IdentityMiddleware};
use sixcities_server::{health_controller, Dispatcher, ServerConfig};
use std::sync::Arc;

/// Every long-lived service of the REST application.
#[derive(Debug, Clone)]
pub struct App {
    tokens: Arc<TokenService>,
    users: Arc<UserService>,
    offers: Arc<OfferService>,
    favorites: Arc<FavoriteService>,
    storage: Arc<DiskFileStorage>,
    anonymous_id: String,
}

impl App {
    /// Creates the services, the upload directory and the anonymous user.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let tokens = TokenService::new(&config.auth.jwt_secret)
            .context("failed to create token service")?;

        let storage = DiskFileStorage::new(&config.storage.upload_directory);
        storage.ensure_dir().await.with_context(|| {
            format!(
                "failed to create upload directory {}",
                storage.directory().display()
            )
        })?;

        let users = UserService::new(config.auth.salt.clone());
        let anonymous_id = users.ensure_user(&config.anonymous.email, &config.anonymous.name);
        tracing::info!(anonymous_id = %anonymous_id, "anonymous user ready");

        Ok(Self {
            tokens: Arc::new(tokens),
            users: Arc::new(users),
            offers: Arc::new(OfferService::new()),
            favorites: Arc::new(FavoriteService::new()),
            storage: Arc::new(storage),
            anonymous_id,
        })
    }

    /// Id of the user unauthenticated callers act as.
    pub fn anonymous_id(&self) -> &str {
        &self.anonymous_id
    }

    /// Token service shared with the identity stage.
    pub fn tokens(&self) -> &Arc<TokenService> {
        &self.tokens
    }

    /// User store.
    pub fn users(&self) -> &Arc<UserService> {
        &self.users
    }

    /// Offer store.
    pub fn offers(&self) -> &Arc<OfferService> {
        &self.offers
    }

    /// Favorite store.
    pub fn favorites(&self) -> &Arc<FavoriteService> {
        &self.favorites
    }

    /// Mounts every controller behind the identity stage.
    pub fn dispatcher(&self) -> anyhow::Result<Dispatcher> {
        let offers = OfferController::new(
            Arc::clone(&self.offers),
            Arc::clone(&self.favorites),
            self.anonymous_id.clone(),
        );
        let users = UserController::new(
            Arc::clone(&self.users),
            Arc::clone(&self.tokens),
            Arc::clone(&self.storage) as Arc<dyn FileStorage>,
        );
        let favorites = FavoriteController::new(Arc::clone(&self.offers), Arc::clone(&self.favorites));
        let uploads = StaticController::new(Arc::clone(&self.storage));

        let dispatcher = Dispatcher::builder()
            .global(IdentityMiddleware::new(Arc::clone(&self.tokens)))
            .mount(offers.controller()?)?
            .mount(users.controller()?)?
            .mount(favorites.controller()?)?
            .mount(uploads.controller()?)?
            .mount(health_controller()?)?
            .build();

        for route in dispatcher.routes() {
            tracing::debug!(route = %route.label(), "route registered");
        }
        Ok(dispatcher)
    }
}

/// Builds the application and its dispatcher from `config`.
pub async fn build_dispatcher(config: &AppConfig) -> anyhow::Result<Dispatcher> {
    App::new(config).await?.dispatcher()
}

/// Server settings taken from `config`.
pub fn server_config(config: &AppConfig) -> ServerConfig {
    ServerConfig::builder()
        .http_addr(config.server.http_addr.clone())
        .request_timeout(config.request_timeout())
        .max_body_size(config.server.max_body_size)
        .shutdown_timeout(config.shutdown_timeout())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(dir: &std::path::Path) -> AppConfig {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "secret".to_string();
        config.auth.salt = "salt".to_string();
        config.storage.upload_directory = dir.join("upload").display().to_string();
        config
    }

    #[tokio::test]
    async fn test_new_creates_upload_dir_and_anonymous_user() {
        let dir = tempfile::tempdir().unwrap();
        let app = App::new(&config(dir.path())).await.unwrap();

        assert!(dir.path().join("upload").is_dir());
        let anonymous = app.users().find_by_id(app.anonymous_id()).unwrap();
        assert_eq!(anonymous.email, "anonymous@six-cities.local");
    }

    #[tokio::test]
    async fn test_empty_secret_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path());
        config.auth.jwt_secret.clear();

        assert!(App::new(&config).await.is_err());
    }

    #[tokio::test]
    async fn test_dispatcher_mounts_every_route() {
        let dir = tempfile::tempdir().unwrap();
        let dispatcher = build_dispatcher(&config(dir.path())).await.unwrap();

        let labels: Vec<String> = dispatcher.routes().map(|r| r.label()).collect();
        assert_eq!(labels.len(), 14);
        assert!(labels.iter().any(|l| l == "POST /users/avatar"));
        assert!(labels.iter().any(|l| l == "GET /static/:filename"));
        assert_eq!(dispatcher.global_middleware_names(), vec!["IdentityMiddleware"]);
    }

    #[test]
    fn test_server_config_follows_settings() {
        let mut config = AppConfig::default();
        config.server.http_addr = "127.0.0.1:5000".to_string();
        config.server.max_body_size = 1024;

        let server = server_config(&config);
        assert_eq!(server.http_addr(), "127.0.0.1:5000");
        assert_eq!(server.max_body_size(), 1024);
    }
}
