//! Middleware stages.
//!
//! [`IdentityMiddleware`] is installed once for every route. The remaining
//! stages are attached per route, in the order the route declares them;
//! the object-id guard always goes before the existence guard.

mod auth;
mod exists;
mod identity;
mod object_id;
mod upload;

pub use auth::AuthGuard;
pub use exists::DocumentExistsMiddleware;
pub use identity::{IdentityMiddleware, AUTHORIZATION_HEADER};
pub use object_id::{is_object_id, ValidateObjectIdMiddleware};
pub use upload::{MultipartLimits, UploadFileMiddleware, DEFAULT_MAX_FILE_SIZE};
