//! # Six Cities REST
//!
//! Rental offer service built on the six cities request pipeline.
//!
//! - [`offer`] - Offer listing, detail, CRUD and premium-by-city queries
//! - [`user`] - Registration, login and avatar upload
//! - [`favorite`] - Per-user favorite offers
//! - [`storage`] - Uploaded files on the local disk
//! - [`static_files`] - Serving uploaded files under `/static`
//! - [`app`] - Composition root building the [`Dispatcher`](sixcities_server::Dispatcher)
//!
//! # Example
//!
//! ```no_run
//! use sixcities_config::AppConfig;
//! use sixcities_rest::app::{build_dispatcher, server_config};
//! use sixcities_server::Server;
//!
//! # async fn run(config: AppConfig) -> anyhow::Result<()> {
//! let dispatcher = build_dispatcher(&config).await?;
//! Server::new(server_config(&config), dispatcher).run().await?;
//! # Ok(())
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/sixcities-rest/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod app;
pub mod favorite;
mod ids;
pub mod offer;
pub mod static_files;
pub mod storage;
pub mod user;

pub use app::{build_dispatcher, App};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
