//! # Six Cities Core
//!
//! Types shared by every stage of the request pipeline:
//!
//! - [`AppError`] - The one structured failure type; carries status, message and origin
//! - [`RequestContext`] - Per-request state owned by the dispatcher
//! - [`RequestId`] - UUID v7 request identifier
//! - [`Reply`] - A response written exactly once per request
//! - [`BoxFuture`] - Boxed future returned by middlewares and handlers

#![doc(html_root_url = "https://docs.rs/sixcities-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod error;
mod response;

use std::future::Future;
use std::pin::Pin;

pub use context::{RequestContext, RequestId};
pub use error::{AppError, AppResult, ErrorEnvelope};
pub use response::{Reply, Response, APPLICATION_JSON};

/// A boxed future that is `Send`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Outcome of a middleware or handler step.
///
/// Typed failures travel as an [`AppError`] inside the `anyhow::Error`;
/// anything else is treated as an unexpected fault.
pub type StepResult = anyhow::Result<()>;
