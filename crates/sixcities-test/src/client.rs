//! In-memory client over a [`Dispatcher`].

use crate::error::TestError;
use crate::request::{FilePart, TestRequestBuilder};
use crate::response::TestResponse;
use bytes::Bytes;
use http::Method;
use serde::Serialize;
use sixcities_server::Dispatcher;
use std::sync::Arc;

/// Sends requests straight to a [`Dispatcher`], without sockets.
///
/// ```ignore
/// let client = TestClient::new(dispatcher);
/// let response = client.post("/users/login").json(&body).send().await;
/// response.assert_status(StatusCode::OK);
/// ```
#[must_use]
#[derive(Debug, Clone)]
pub struct TestClient {
    dispatcher: Arc<Dispatcher>,
    default_headers: Vec<(String, String)>,
}

impl TestClient {
    /// Wraps `dispatcher`.
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self::from_shared(Arc::new(dispatcher))
    }

    /// Wraps a shared dispatcher.
    pub fn from_shared(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            dispatcher,
            default_headers: Vec::new(),
        }
    }

    /// Adds a header sent with every request.
    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Starts a GET request.
    pub fn get(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::GET, uri)
    }

    /// Starts a POST request.
    pub fn post(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::POST, uri)
    }

    /// Starts a PATCH request.
    pub fn patch(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::PATCH, uri)
    }

    /// Starts a DELETE request.
    pub fn delete(&self, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        self.request(Method::DELETE, uri)
    }

    /// Starts a request with any method.
    pub fn request(&self, method: Method, uri: impl AsRef<str>) -> TestClientRequest<'_> {
        let mut builder = TestRequestBuilder::new(method, uri);
        for (name, value) in &self.default_headers {
            builder = builder.header(name, value);
        }
        TestClientRequest {
            client: self,
            builder,
        }
    }

    async fn send_internal(&self, request: http::Request<Bytes>) -> Result<TestResponse, TestError> {
        let response = self.dispatcher.dispatch(request).await;
        TestResponse::from_http(response).await
    }
}

/// A request bound to a [`TestClient`].
#[must_use]
#[derive(Debug)]
pub struct TestClientRequest<'a> {
    client: &'a TestClient,
    builder: TestRequestBuilder,
}

impl TestClientRequest<'_> {
    /// Sets a header.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.builder = self.builder.header(name, value);
        self
    }

    /// Sets `Authorization: Bearer <token>`.
    pub fn bearer_token(mut self, token: impl AsRef<str>) -> Self {
        self.builder = self.builder.bearer_token(token);
        self
    }

    /// Sets the raw body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.builder = self.builder.body(body);
        self
    }

    /// Sets a JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        self.builder = self.builder.json(value);
        self
    }

    /// Sets a multipart body.
    pub fn multipart(mut self, parts: &[FilePart]) -> Self {
        self.builder = self.builder.multipart(parts);
        self
    }

    /// Sends the request.
    ///
    /// # Panics
    ///
    /// When the request cannot be built or the body cannot be read.
    pub async fn send(self) -> TestResponse {
        match self.try_send().await {
            Ok(response) => response,
            Err(e) => panic!("test request failed: {e}"),
        }
    }

    /// Sends the request, returning build and read failures.
    pub async fn try_send(self) -> Result<TestResponse, TestError> {
        let request = self.builder.build()?;
        self.client.send_internal(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use serde_json::json;
    use sixcities_server::Controller;

    fn echo_client() -> TestClient {
        let mut controller = Controller::new("/echo");
        controller
            .add_route(
                Method::POST,
                "/",
                |ctx| {
                    Box::pin(async move {
                        let auth = ctx.header("authorization").map(str::to_string);
                        let body: serde_json::Value = ctx.json()?;
                        Controller::ok(ctx, &json!({ "auth": auth, "body": body }))?;
                        anyhow::Ok(())
                    })
                },
                Vec::new(),
            )
            .unwrap();
        TestClient::new(Dispatcher::builder().mount(controller).unwrap().build())
    }

    #[tokio::test]
    async fn test_json_roundtrip_through_dispatcher() {
        let client = echo_client();

        let response = client
            .post("/echo")
            .bearer_token("t0ken")
            .json(&json!({ "title": "Loft" }))
            .send()
            .await;

        response.assert_status(StatusCode::OK);
        let value = response.json_value().unwrap();
        assert_eq!(value["auth"], "Bearer t0ken");
        assert_eq!(value["body"]["title"], "Loft");
    }

    #[tokio::test]
    async fn test_default_headers_applied() {
        let client = echo_client().with_default_header("authorization", "Bearer shared");

        let response = client.post("/echo").json(&json!({})).send().await;

        assert_eq!(response.json_value().unwrap()["auth"], "Bearer shared");
    }

    #[tokio::test]
    async fn test_error_envelope_helpers() {
        let client = echo_client();

        let response = client.get("/missing").send().await;

        response.assert_error(StatusCode::NOT_FOUND, "Route GET /missing not found");
        assert!(response.header_str("x-request-id").is_some());
    }
}
