//! Route registration errors.

use http::Method;
use thiserror::Error;

/// Errors raised while building a route table.
///
/// Both variants are programming errors and are expected to abort startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// A route with the same method and path shape is already registered.
    #[error("duplicate route {method} {path} (already registered as {existing})")]
    Duplicate {
        /// HTTP method of the rejected route.
        method: Method,
        /// Template of the rejected route.
        path: String,
        /// Template of the route registered earlier.
        existing: String,
    },

    /// The path template could not be parsed.
    #[error("invalid path template {path:?}: {reason}")]
    InvalidTemplate {
        /// The offending template.
        path: String,
        /// What is wrong with it.
        reason: &'static str,
    },
}
