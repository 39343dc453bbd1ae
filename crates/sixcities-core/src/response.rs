//! Response values written by handlers and the exception filter.

use crate::error::{AppError, AppResult};
use bytes::Bytes;
use http::{header, HeaderValue, StatusCode};
use http_body_util::Full;
use serde::Serialize;

/// The HTTP response type produced by the dispatcher.
pub type Response = http::Response<Full<Bytes>>;

/// Content type of every JSON body.
pub const APPLICATION_JSON: &str = "application/json";

/// A status plus an optional body with its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    status: StatusCode,
    body: Bytes,
    content_type: Option<&'static str>,
}

impl Reply {
    /// A JSON reply.
    ///
    /// # Errors
    ///
    /// Returns a 500 [`AppError`] if `payload` cannot be serialized.
    pub fn json<T: Serialize + ?Sized>(status: StatusCode, payload: &T) -> AppResult<Self> {
        let body = serde_json::to_vec(payload).map_err(|e| {
            AppError::wrap_unexpected(e).with_origin("Reply::json")
        })?;
        Ok(Self {
            status,
            body: Bytes::from(body),
            content_type: Some(APPLICATION_JSON),
        })
    }

    /// A reply without a body.
    #[must_use]
    pub const fn empty(status: StatusCode) -> Self {
        Self {
            status,
            body: Bytes::new(),
            content_type: None,
        }
    }

    /// A reply carrying raw bytes of `content_type`.
    #[must_use]
    pub fn bytes(status: StatusCode, content_type: &'static str, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
            content_type: Some(content_type),
        }
    }

    /// The error reply for `err`: its status and `{ "error": message }`.
    #[must_use]
    pub fn from_error(err: &AppError) -> Self {
        let body = serde_json::to_vec(&err.to_envelope()).unwrap_or_else(|_| {
            br#"{"error":"Internal error"}"#.to_vec()
        });
        Self {
            status: err.status(),
            body: Bytes::from(body),
            content_type: Some(APPLICATION_JSON),
        }
    }

    /// Response status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Declared content type, if the reply has a body.
    #[must_use]
    pub const fn content_type(&self) -> Option<&'static str> {
        self.content_type
    }

    /// Raw body bytes.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Converts into an HTTP response.
    #[must_use]
    pub fn into_response(self) -> Response {
        let mut response = http::Response::new(Full::new(self.body));
        *response.status_mut() = self.status;
        if let Some(content_type) = self.content_type {
            response
                .headers_mut()
                .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        response
    }
}
