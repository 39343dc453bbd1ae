//! # Six Cities Config
//!
//! Typed, layered configuration: defaults, then a TOML or JSON file, then
//! `SIXCITIES__SECTION__KEY` environment variables (optionally read from a
//! `.env` file). Unknown keys in files are rejected.
//!
//! ```toml
//! [server]
//! http_addr = "0.0.0.0:4000"
//! request_timeout_secs = 30
//! max_body_size = 10485760
//! shutdown_timeout_secs = 30
//!
//! [auth]
//! jwt_secret = "change-me"
//! salt = "change-me-too"
//!
//! [storage]
//! upload_directory = "upload"
//!
//! [anonymous]
//! email = "anonymous@six-cities.local"
//! name = "Anonymous"
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```

#![doc(html_root_url = "https://docs.rs/sixcities-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::AppConfig;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{AnonymousSettings, AuthSettings, LoggingSettings, ServerSettings, StorageSettings};
pub use sixcities_telemetry::LogFormat;
