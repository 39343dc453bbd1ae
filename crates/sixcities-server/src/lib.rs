//! # Six Cities Server
//!
//! The request pipeline and its HTTP front end.
//!
//! - [`Controller`] - Route registration and the `ok` / `created` / `no_content` helpers
//! - [`Dispatcher`] - Runs global middlewares, route middlewares and the handler
//! - [`ExceptionFilter`] - Formats every failure as `{ "error": message }`
//! - [`Server`] - hyper HTTP/1.1 accept loop with graceful shutdown
//!
//! ## Example
//!
//! ```rust,ignore
//! let dispatcher = Dispatcher::builder()
//!     .global(IdentityMiddleware::new(tokens))
//!     .mount(offer_controller)?
//!     .mount(user_controller)?
//!     .build();
//!
//! Server::new(ServerConfig::default(), dispatcher).run().await?;
//! ```

#![doc(html_root_url = "https://docs.rs/sixcities-server/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod controller;
mod dispatcher;
mod error;
mod filter;
mod health;
mod server;
pub mod shutdown;

pub use config::{
    ServerConfig, ServerConfigBuilder, DEFAULT_HTTP_ADDR, DEFAULT_MAX_BODY_SIZE,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SHUTDOWN_TIMEOUT_SECS,
};
pub use controller::{Controller, Handler, Route};
pub use dispatcher::{Dispatcher, DispatcherBuilder, REQUEST_ID_HEADER};
pub use error::ServerError;
pub use filter::ExceptionFilter;
pub use health::health_controller;
pub use server::Server;
pub use shutdown::ShutdownSignal;
pub use sixcities_router::RouteError;
