//! Entity existence guard.

use crate::capability::DocumentExists;
use crate::middleware::Middleware;
use sixcities_core::{AppError, BoxFuture, RequestContext, StepResult};
use std::fmt;
use std::sync::Arc;

/// Rejects a request whose path parameter names an entity that does not
/// exist.
///
/// Calls [`DocumentExists::exists_by_id`] exactly once. A lookup failure is
/// not a 404; it propagates as an unexpected fault.
#[derive(Clone)]
pub struct DocumentExistsMiddleware {
    lookup: Arc<dyn DocumentExists>,
    entity: String,
    param: String,
}

impl DocumentExistsMiddleware {
    /// Guards `param`, reporting misses as `<entity> with id <id> not found`.
    pub fn new(
        lookup: Arc<dyn DocumentExists>,
        entity: impl Into<String>,
        param: impl Into<String>,
    ) -> Self {
        Self {
            lookup,
            entity: entity.into(),
            param: param.into(),
        }
    }

    async fn check(&self, ctx: &mut RequestContext) -> StepResult {
        let id = ctx.param(&self.param).unwrap_or_default();

        if self.lookup.exists_by_id(id).await? {
            return Ok(());
        }

        Err(AppError::not_found(format!("{} with id {id} not found", self.entity))
            .with_origin(self.name())
            .into())
    }
}

impl fmt::Debug for DocumentExistsMiddleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentExistsMiddleware")
            .field("entity", &self.entity)
            .field("param", &self.param)
            .finish_non_exhaustive()
    }
}

impl Middleware for DocumentExistsMiddleware {
    fn name(&self) -> &'static str {
        "DocumentExistsMiddleware"
    }

    fn execute<'a>(&'a self, ctx: &'a mut RequestContext) -> BoxFuture<'a, StepResult> {
        Box::pin(self.check(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::test_support::{app_error, context, request};
    use http::StatusCode;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorder {
        known: Vec<&'static str>,
        calls: Mutex<Vec<String>>,
        fail: bool,
    }

    impl DocumentExists for Recorder {
        fn exists_by_id<'a>(&'a self, id: &'a str) -> BoxFuture<'a, anyhow::Result<bool>> {
            self.calls.lock().push(id.to_string());
            let result = if self.fail {
                Err(anyhow::anyhow!("store unavailable"))
            } else {
                Ok(self.known.iter().any(|known| *known == id))
            };
            Box::pin(std::future::ready(result))
        }
    }

    fn ctx(id: &str) -> RequestContext {
        let mut ctx = context(request("/offers/x"));
        ctx.set_params([("offerId", id)].into_iter().collect());
        ctx
    }

    #[tokio::test]
    async fn test_existing_entity_passes() {
        let lookup = Arc::new(Recorder {
            known: vec!["65a1f0c2e4b0a1b2c3d4e5f6"],
            ..Recorder::default()
        });
        let mw = DocumentExistsMiddleware::new(lookup.clone(), "Offer", "offerId");

        mw.execute(&mut ctx("65a1f0c2e4b0a1b2c3d4e5f6")).await.unwrap();
        assert_eq!(lookup.calls.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_entity_is_404_after_one_lookup() {
        let lookup = Arc::new(Recorder::default());
        let mw = DocumentExistsMiddleware::new(lookup.clone(), "Offer", "offerId");

        let err = app_error(mw.execute(&mut ctx("65a1f0c2e4b0a1b2c3d4e5f6")).await);
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Offer with id 65a1f0c2e4b0a1b2c3d4e5f6 not found");
        assert_eq!(*lookup.calls.lock(), vec!["65a1f0c2e4b0a1b2c3d4e5f6".to_string()]);
    }

    #[tokio::test]
    async fn test_lookup_failure_is_not_a_404() {
        let lookup = Arc::new(Recorder {
            fail: true,
            ..Recorder::default()
        });
        let mw = DocumentExistsMiddleware::new(lookup, "Offer", "offerId");

        let err = mw.execute(&mut ctx("65a1f0c2e4b0a1b2c3d4e5f6")).await.unwrap_err();
        assert!(err.downcast_ref::<AppError>().is_none());
        assert_eq!(err.to_string(), "store unavailable");
    }
}
