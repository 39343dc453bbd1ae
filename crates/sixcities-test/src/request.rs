//! Test request building.

use crate::error::TestError;
use bytes::{BufMut, Bytes, BytesMut};
use http::{header, HeaderMap, HeaderName, HeaderValue, Method};
use serde::Serialize;

/// One file part of a `multipart/form-data` body.
#[derive(Debug, Clone)]
pub struct FilePart {
    /// Form field name.
    pub field: String,
    /// File name sent in `Content-Disposition`.
    pub file_name: String,
    /// Part content type.
    pub content_type: String,
    /// File bytes.
    pub data: Bytes,
}

impl FilePart {
    /// Creates a file part.
    pub fn new(
        field: impl Into<String>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            field: field.into(),
            file_name: file_name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }
}

/// Builder for requests sent through a [`TestClient`](crate::TestClient).
#[must_use]
#[derive(Debug)]
pub struct TestRequestBuilder {
    method: Method,
    uri: String,
    headers: HeaderMap,
    body: Option<Bytes>,
    error: Option<TestError>,
}

impl TestRequestBuilder {
    /// Creates a builder.
    pub fn new(method: Method, uri: impl AsRef<str>) -> Self {
        Self {
            method,
            uri: uri.as_ref().to_string(),
            headers: HeaderMap::new(),
            body: None,
            error: None,
        }
    }

    /// Sets a header. An invalid name or value surfaces from [`build`](Self::build).
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        let name = HeaderName::try_from(name.as_ref());
        let value = HeaderValue::try_from(value.as_ref());
        match (name, value) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            (Err(e), _) => self.fail(format!("invalid header name: {e}")),
            (_, Err(e)) => self.fail(format!("invalid header value: {e}")),
        }
        self
    }

    /// Sets `Content-Type`.
    pub fn content_type(self, content_type: impl AsRef<str>) -> Self {
        self.header(header::CONTENT_TYPE.as_str(), content_type)
    }

    /// Sets `Authorization: Bearer <token>`.
    pub fn bearer_token(self, token: impl AsRef<str>) -> Self {
        self.header(
            header::AUTHORIZATION.as_str(),
            format!("Bearer {}", token.as_ref()),
        )
    }

    /// Sets the raw body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets a JSON body and `Content-Type: application/json`.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(bytes) => self.body = Some(Bytes::from(bytes)),
            Err(e) => self.fail(format!("JSON serialization failed: {e}")),
        }
        self.content_type("application/json")
    }

    /// Sets a `multipart/form-data` body holding `parts`.
    pub fn multipart(mut self, parts: &[FilePart]) -> Self {
        let boundary = format!("sixcities-{}", uuid::Uuid::new_v4().simple());
        self.body = Some(encode_multipart(&boundary, parts));
        self.content_type(format!("multipart/form-data; boundary={boundary}"))
    }

    /// Finishes the request.
    pub fn build(self) -> Result<http::Request<Bytes>, TestError> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let mut request = http::Request::builder()
            .method(self.method)
            .uri(self.uri)
            .body(self.body.unwrap_or_default())
            .map_err(|e| TestError::RequestBuild(e.to_string()))?;
        *request.headers_mut() = self.headers;
        Ok(request)
    }

    fn fail(&mut self, message: String) {
        if self.error.is_none() {
            self.error = Some(TestError::RequestBuild(message));
        }
    }
}

fn encode_multipart(boundary: &str, parts: &[FilePart]) -> Bytes {
    let mut body = BytesMut::new();
    for part in parts {
        body.put_slice(format!("--{boundary}\r\n").as_bytes());
        body.put_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                part.field, part.file_name
            )
            .as_bytes(),
        );
        body.put_slice(format!("Content-Type: {}\r\n\r\n", part.content_type).as_bytes());
        body.put_slice(&part.data);
        body.put_slice(b"\r\n");
    }
    body.put_slice(format!("--{boundary}--\r\n").as_bytes());
    body.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bearer_token() {
        let request = TestRequestBuilder::new(Method::GET, "/favorites")
            .bearer_token("abc")
            .build()
            .unwrap();

        assert_eq!(request.headers()["authorization"], "Bearer abc");
    }

    #[test]
    fn test_json_body() {
        let request = TestRequestBuilder::new(Method::POST, "/users/login")
            .json(&json!({"email": "keks@example.com"}))
            .build()
            .unwrap();

        assert_eq!(request.headers()["content-type"], "application/json");
        assert_eq!(request.body().as_ref(), br#"{"email":"keks@example.com"}"#);
    }

    #[test]
    fn test_multipart_body() {
        let request = TestRequestBuilder::new(Method::POST, "/users/avatar")
            .multipart(&[FilePart::new("avatar", "me.png", "image/png", &b"PNG"[..])])
            .build()
            .unwrap();

        let content_type = request.headers()["content-type"].to_str().unwrap();
        let boundary = content_type.split("boundary=").nth(1).unwrap();
        let body = std::str::from_utf8(request.body()).unwrap();

        assert!(content_type.starts_with("multipart/form-data"));
        assert!(body.starts_with(&format!("--{boundary}\r\n")));
        assert!(body.contains(r#"name="avatar"; filename="me.png""#));
        assert!(body.ends_with(&format!("--{boundary}--\r\n")));
    }

    #[test]
    fn test_invalid_header_reported_on_build() {
        let result = TestRequestBuilder::new(Method::GET, "/")
            .header("bad header", "x")
            .build();

        assert!(matches!(result, Err(TestError::RequestBuild(_))));
    }
}
