//! # Six Cities Middleware
//!
//! The [`Middleware`] trait and the stages that run ahead of handlers.
//!
//! ## Stages
//!
//! | Stage                           | Scope      | Rejects with                          |
//! |---------------------------------|------------|---------------------------------------|
//! | [`IdentityMiddleware`]          | every route| 401 `Invalid token`                   |
//! | [`AuthGuard`]                   | per route  | 401 `User is not authenticated`       |
//! | [`ValidateObjectIdMiddleware`]  | per route  | 400 `<param> is invalid`              |
//! | [`DocumentExistsMiddleware`]    | per route  | 404 `<Entity> with id <id> not found` |
//! | [`UploadFileMiddleware`]        | per route  | 400 / 413 on a bad multipart body     |
//!
//! Stages either return `Ok(())` to let the chain continue or an error to
//! stop it. They never write a response themselves.

#![doc(html_root_url = "https://docs.rs/sixcities-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod capability;
mod middleware;
pub mod stages;

pub use capability::{DocumentExists, FileStorage, UploadedFile};
pub use middleware::{FnMiddleware, Middleware};
pub use stages::{
    AuthGuard, DocumentExistsMiddleware, IdentityMiddleware, MultipartLimits,
    UploadFileMiddleware, ValidateObjectIdMiddleware,
};
