//! Multipart file upload.
//!
//! Parses a `multipart/form-data` body, saves the first file sent under the
//! configured field name through a [`FileStorage`], and records the stored
//! filename on the context. A request without such a field passes through
//! untouched; the handler decides whether the file was required.

use crate::capability::{FileStorage, UploadedFile};
use crate::middleware::Middleware;
use futures_util::stream;
use http::{header, StatusCode};
use sixcities_core::{AppError, BoxFuture, RequestContext, StepResult};
use std::fmt;
use std::sync::Arc;

/// Default maximum size of one uploaded file (5 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// Size limits applied while parsing the multipart body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultipartLimits {
    /// Maximum bytes in any single field.
    pub max_file_size: u64,
}

impl Default for MultipartLimits {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

/// Stores the file sent in one multipart field.
#[derive(Clone)]
pub struct UploadFileMiddleware {
    storage: Arc<dyn FileStorage>,
    field: String,
    limits: MultipartLimits,
}

impl UploadFileMiddleware {
    /// Accepts the file sent as `field`.
    pub fn new(storage: Arc<dyn FileStorage>, field: impl Into<String>) -> Self {
        Self {
            storage,
            field: field.into(),
            limits: MultipartLimits::default(),
        }
    }

    /// Overrides the size limits.
    #[must_use]
    pub fn with_limits(mut self, limits: MultipartLimits) -> Self {
        self.limits = limits;
        self
    }

    fn rejection(&self, err: &multer::Error) -> AppError {
        let rejection = match err {
            multer::Error::FieldSizeExceeded { .. } | multer::Error::StreamSizeExceeded { .. } => {
                AppError::new(StatusCode::PAYLOAD_TOO_LARGE, "Uploaded file is too large")
            }
            _ => AppError::bad_request(format!("Malformed multipart body: {err}")),
        };
        rejection.with_origin(self.name())
    }

    async fn store(&self, ctx: &mut RequestContext) -> StepResult {
        let boundary = ctx
            .header(header::CONTENT_TYPE.as_str())
            .and_then(|ct| multer::parse_boundary(ct).ok())
            .ok_or_else(|| {
                AppError::bad_request("Expected multipart/form-data body").with_origin(self.name())
            })?;

        let body = ctx.body().clone();
        let source = stream::once(async move { Ok::<_, std::io::Error>(body) });
        let constraints = multer::Constraints::new()
            .size_limit(multer::SizeLimit::new().per_field(self.limits.max_file_size));
        let mut multipart = multer::Multipart::with_constraints(source, boundary, constraints);

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| self.rejection(&e))?
        {
            if field.name() != Some(self.field.as_str()) {
                continue;
            }
            let Some(file_name) = field.file_name().map(str::to_string) else {
                continue;
            };
            let content_type = field.content_type().map(ToString::to_string);
            let data = field.bytes().await.map_err(|e| self.rejection(&e))?;

            let size = data.len();
            let stored = self
                .storage
                .save(UploadedFile {
                    file_name,
                    content_type,
                    data,
                })
                .await?;

            tracing::info!(
                request_id = %ctx.request_id(),
                field = %self.field,
                stored = %stored,
                size,
                "file uploaded"
            );
            ctx.set_uploaded_file(stored);
            break;
        }

        Ok(())
    }
}

impl fmt::Debug for UploadFileMiddleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadFileMiddleware")
            .field("field", &self.field)
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

impl Middleware for UploadFileMiddleware {
    fn name(&self) -> &'static str {
        "UploadFileMiddleware"
    }

    fn execute<'a>(&'a self, ctx: &'a mut RequestContext) -> BoxFuture<'a, StepResult> {
        Box::pin(self.store(ctx))
    }
}
