//! Shared setup for the REST integration tests.

#![allow(dead_code)]

use http::StatusCode;
use serde_json::{json, Value};
use sixcities_config::AppConfig;
use sixcities_rest::App;
use sixcities_test::TestClient;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const SECRET: &str = "rest-test-secret";
pub const SALT: &str = "rest-test-salt";

/// A running application over a temporary upload directory.
pub struct TestApp {
    pub client: TestClient,
    pub app: App,
    dir: TempDir,
}

impl TestApp {
    pub async fn start() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.auth.jwt_secret = SECRET.to_string();
        config.auth.salt = SALT.to_string();
        config.storage.upload_directory = dir.path().join("upload").display().to_string();

        let app = App::new(&config).await.unwrap();
        let client = TestClient::new(app.dispatcher().unwrap());
        Self { client, app, dir }
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.dir.path().join("upload")
    }

    pub fn uploaded_files(&self) -> Vec<String> {
        list_files(&self.upload_dir())
    }

    /// Registers a user and returns its id.
    pub async fn register(&self, email: &str, password: &str) -> String {
        let response = self
            .client
            .post("/users/register")
            .json(&json!({
                "name": "Keks",
                "email": email,
                "password": password,
                "type": "pro",
            }))
            .send()
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json_value().unwrap()["id"].as_str().unwrap().to_string()
    }

    /// Logs in and returns the token.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .client
            .post("/users/login")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await;
        response.assert_status(StatusCode::OK);
        response.json_value().unwrap()["token"].as_str().unwrap().to_string()
    }

    /// Registers and logs in a fresh user.
    pub async fn signed_in(&self, email: &str) -> String {
        self.register(email, "secret").await;
        self.login(email, "secret").await
    }

    /// Publishes an offer and returns its body.
    pub async fn publish(&self, offer: Value) -> Value {
        let response = self.client.post("/offers").json(&offer).send().await;
        response.assert_status(StatusCode::CREATED);
        response.json_value().unwrap()
    }
}

/// A valid offer payload.
pub fn offer(title: &str, city: &str, premium: bool) -> Value {
    json!({
        "title": title,
        "description": "Quiet flat close to the river.",
        "city": city,
        "previewImage": "preview.jpg",
        "images": ["1.jpg", "2.jpg"],
        "isPremium": premium,
        "type": "apartment",
        "roomsCnt": 2,
        "peopleCnt": 3,
        "price": 120,
        "amenities": ["Breakfast", "Washer"],
        "latitude": 48.8566,
        "longitude": 2.3522,
    })
}

fn list_files(dir: &Path) -> Vec<String> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(Result::ok)
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => Vec::new(),
    }
}
