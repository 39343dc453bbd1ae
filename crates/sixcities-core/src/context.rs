//! Per-request context.
//!
//! A [`RequestContext`] is created by the dispatcher for one request, lent
//! mutably to each middleware and then to the handler, and dropped once the
//! response is sent.

use crate::error::{AppError, AppResult};
use crate::response::Reply;
use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sixcities_auth::Identity;
use sixcities_router::Params;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// A unique identifier for each request, using UUID v7.
///
/// UUID v7 is time-ordered, which keeps log lines for one request easy to
/// find.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new request ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mutable state of one in-flight request.
///
/// The response slot accepts exactly one write: a second call to
/// [`respond`](Self::respond) panics.
#[derive(Debug)]
pub struct RequestContext {
    request_id: RequestId,
    method: Method,
    path: String,
    query: Option<String>,
    headers: HeaderMap,
    params: Params,
    body: Bytes,
    identity: Option<Identity>,
    uploaded_file: Option<String>,
    started_at: Instant,
    reply: Option<Reply>,
}

impl RequestContext {
    /// Creates a context from a fully read request.
    #[must_use]
    pub fn from_request(request: http::Request<Bytes>) -> Self {
        let (parts, body) = request.into_parts();
        Self {
            request_id: RequestId::new(),
            method: parts.method,
            path: parts.uri.path().to_string(),
            query: parts.uri.query().map(str::to_string),
            headers: parts.headers,
            params: Params::new(),
            body,
            identity: None,
            uploaded_file: None,
            started_at: Instant::now(),
            reply: None,
        }
    }

    /// Request identifier.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Request method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Request path, without the query string.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Request headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// A header value, if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Path parameters captured by the matched route.
    #[must_use]
    pub const fn params(&self) -> &Params {
        &self.params
    }

    /// One path parameter.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    /// Replaces the path parameters; called by the dispatcher after matching.
    pub fn set_params(&mut self, params: Params) {
        self.params = params;
    }

    /// Deserializes the query string.
    ///
    /// # Errors
    ///
    /// 400 when the query does not fit `T`.
    pub fn query<T: DeserializeOwned>(&self) -> AppResult<T> {
        serde_urlencoded::from_str(self.query.as_deref().unwrap_or("")).map_err(|e| {
            AppError::bad_request(format!("Invalid query string: {e}")).with_origin("RequestContext")
        })
    }

    /// Raw request body.
    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// Parses the body as JSON.
    ///
    /// # Errors
    ///
    /// 400 `Invalid request body: ...` when the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> AppResult<T> {
        serde_json::from_slice(&self.body).map_err(|e| {
            AppError::bad_request(format!("Invalid request body: {e}")).with_origin("RequestContext")
        })
    }

    /// The verified caller, if a valid token was presented.
    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Attaches the verified caller.
    pub fn set_identity(&mut self, identity: Identity) {
        self.identity = Some(identity);
    }

    /// The caller's id, or `anonymous` when the request is unauthenticated.
    #[must_use]
    pub fn caller_id<'a>(&'a self, anonymous: &'a str) -> &'a str {
        self.identity.as_ref().map_or(anonymous, Identity::id)
    }

    /// Stored filename of the file uploaded with this request.
    #[must_use]
    pub fn uploaded_file(&self) -> Option<&str> {
        self.uploaded_file.as_deref()
    }

    /// Records the stored filename of an upload.
    pub fn set_uploaded_file(&mut self, filename: impl Into<String>) {
        self.uploaded_file = Some(filename.into());
    }

    /// Time since the context was created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Writes the response.
    ///
    /// # Panics
    ///
    /// Panics if a response was already written for this request.
    pub fn respond(&mut self, reply: Reply) {
        assert!(
            self.reply.is_none(),
            "response already written for request {}",
            self.request_id
        );
        self.reply = Some(reply);
    }

    /// Writes a JSON response.
    pub fn respond_json<T: Serialize + ?Sized>(
        &mut self,
        status: StatusCode,
        payload: &T,
    ) -> AppResult<()> {
        let reply = Reply::json(status, payload)?;
        self.respond(reply);
        Ok(())
    }

    /// `true` once a response has been written.
    #[must_use]
    pub const fn is_responded(&self) -> bool {
        self.reply.is_some()
    }

    /// The written response, if any.
    #[must_use]
    pub const fn reply(&self) -> Option<&Reply> {
        self.reply.as_ref()
    }

    /// Consumes the context, returning the written response.
    #[must_use]
    pub fn into_reply(self) -> Option<Reply> {
        self.reply
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    fn context(uri: &str, body: &'static str) -> RequestContext {
        RequestContext::from_request(
            http::Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header("x-test", "yes")
                .body(Bytes::from_static(body.as_bytes()))
                .unwrap(),
        )
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Login {
        email: String,
        password: String,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Limit {
        limit: Option<usize>,
    }

    #[test]
    fn test_request_ids_are_unique() {
        assert_ne!(RequestId::new(), RequestId::new());
    }

    #[test]
    fn test_from_request_splits_path_and_query() {
        let ctx = context("/offers?limit=5", "");
        assert_eq!(ctx.method(), &Method::POST);
        assert_eq!(ctx.path(), "/offers");
        assert_eq!(ctx.header("x-test"), Some("yes"));
        assert_eq!(ctx.query::<Limit>().unwrap(), Limit { limit: Some(5) });
    }

    #[test]
    fn test_missing_query_uses_defaults() {
        let ctx = context("/offers", "");
        assert_eq!(ctx.query::<Limit>().unwrap(), Limit { limit: None });
    }

    #[test]
    fn test_bad_query_is_400() {
        let ctx = context("/offers?limit=many", "");
        let err = ctx.query::<Limit>().unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_json_body() {
        let ctx = context("/users/login", r#"{"email":"a@b.c","password":"pw"}"#);
        let login: Login = ctx.json().unwrap();
        assert_eq!(login.email, "a@b.c");
        assert_eq!(login.password, "pw");
    }

    #[test]
    fn test_invalid_json_body_is_400() {
        let ctx = context("/users/login", r#"{"email":1}"#);
        let err = ctx.json::<Login>().unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.message().starts_with("Invalid request body"));
    }

    #[test]
    fn test_caller_id_falls_back_to_anonymous() {
        let ctx = context("/offers", "");
        assert!(ctx.identity().is_none());
        assert_eq!(ctx.caller_id("anon"), "anon");
    }

    #[test]
    fn test_params() {
        let mut ctx = context("/offers/abc", "");
        ctx.set_params([("offerId", "abc")].into_iter().collect());
        assert_eq!(ctx.param("offerId"), Some("abc"));
        assert_eq!(ctx.param("other"), None);
    }

    #[test]
    fn test_single_response() {
        let mut ctx = context("/offers", "");
        assert!(!ctx.is_responded());

        ctx.respond(Reply::empty(StatusCode::NO_CONTENT));
        assert!(ctx.is_responded());
        assert_eq!(ctx.into_reply().unwrap().status(), StatusCode::NO_CONTENT);
    }

    #[test]
    #[should_panic(expected = "response already written")]
    fn test_second_response_panics() {
        let mut ctx = context("/offers", "");
        ctx.respond(Reply::empty(StatusCode::NO_CONTENT));
        ctx.respond_json(StatusCode::OK, &[1, 2, 3]).unwrap();
    }
}
