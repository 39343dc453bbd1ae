//! Identifier format guard.

use crate::middleware::Middleware;
use sixcities_core::{AppError, BoxFuture, RequestContext, StepResult};

/// Length of a store identifier in hex digits (12 bytes).
const OBJECT_ID_LEN: usize = 24;

/// `true` for a well-formed store identifier: exactly 24 ASCII hex digits.
#[must_use]
pub fn is_object_id(value: &str) -> bool {
    value.len() == OBJECT_ID_LEN && value.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Rejects a request whose path parameter is not a store identifier.
///
/// Runs before [`DocumentExistsMiddleware`](super::DocumentExistsMiddleware)
/// so that a malformed id never reaches a lookup.
#[derive(Debug, Clone)]
pub struct ValidateObjectIdMiddleware {
    param: String,
}

impl ValidateObjectIdMiddleware {
    /// Guards the path parameter `param`.
    #[must_use]
    pub fn new(param: impl Into<String>) -> Self {
        Self {
            param: param.into(),
        }
    }
}

impl Middleware for ValidateObjectIdMiddleware {
    fn name(&self) -> &'static str {
        "ValidateObjectIdMiddleware"
    }

    fn execute<'a>(&'a self, ctx: &'a mut RequestContext) -> BoxFuture<'a, StepResult> {
        let valid = ctx.param(&self.param).is_some_and(is_object_id);
        let result: StepResult = if valid {
            Ok(())
        } else {
            Err(AppError::bad_request(format!("{} is invalid", self.param))
                .with_origin(self.name())
                .into())
        };
        Box::pin(std::future::ready(result))
    }
}
