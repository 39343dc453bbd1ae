//! # Six Cities Test
//!
//! Drives a [`Dispatcher`](sixcities_server::Dispatcher) in memory: requests
//! go through the identity stage, route middlewares, handler and exception
//! filter exactly as they would behind the HTTP server, without binding a port.
//!
//! ```ignore
//! let client = TestClient::new(build_dispatcher(&config).await?);
//!
//! client
//!     .post("/users/login")
//!     .json(&json!({ "email": "keks@example.com", "password": "secret" }))
//!     .send()
//!     .await
//!     .assert_status(StatusCode::OK);
//! ```

#![doc(html_root_url = "https://docs.rs/sixcities-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod request;
mod response;

pub use client::{TestClient, TestClientRequest};
pub use error::TestError;
pub use request::{FilePart, TestRequestBuilder};
pub use response::TestResponse;
