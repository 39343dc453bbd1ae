//! Configuration sections.

use serde::{Deserialize, Serialize};
use sixcities_telemetry::LogFormat;

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServerSettings {
    /// Bind address, e.g. `0.0.0.0:4000`.
    #[serde(default = "default_http_addr")]
    pub http_addr: String,

    /// Upper bound for reading one request body.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Largest accepted request body in bytes.
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,

    /// Grace period for open connections on shutdown.
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            http_addr: default_http_addr(),
            request_timeout_secs: default_request_timeout_secs(),
            max_body_size: default_max_body_size(),
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
        }
    }
}

fn default_http_addr() -> String {
    "0.0.0.0:4000".to_string()
}

const fn default_request_timeout_secs() -> u64 {
    30
}

const fn default_max_body_size() -> usize {
    10 * 1024 * 1024
}

const fn default_shutdown_timeout_secs() -> u64 {
    30
}

/// Token signing and password hashing secrets.
///
/// Both default to empty, which fails validation: they must come from a file
/// or the environment.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct AuthSettings {
    /// HS256 signing secret.
    #[serde(default)]
    pub jwt_secret: String,

    /// Salt mixed into password hashes.
    #[serde(default)]
    pub salt: String,
}

impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSettings")
            .field("jwt_secret", &redact(&self.jwt_secret))
            .field("salt", &redact(&self.salt))
            .finish()
    }
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() {
        "<empty>"
    } else {
        "<redacted>"
    }
}

/// Where uploaded files land.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StorageSettings {
    /// Directory for uploaded files; created on startup if missing.
    #[serde(default = "default_upload_directory")]
    pub upload_directory: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            upload_directory: default_upload_directory(),
        }
    }
}

fn default_upload_directory() -> String {
    "upload".to_string()
}

/// The user that unauthenticated requests act as.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AnonymousSettings {
    /// Email of the anonymous account.
    #[serde(default = "default_anonymous_email")]
    pub email: String,

    /// Display name of the anonymous account.
    #[serde(default = "default_anonymous_name")]
    pub name: String,
}

impl Default for AnonymousSettings {
    fn default() -> Self {
        Self {
            email: default_anonymous_email(),
            name: default_anonymous_name(),
        }
    }
}

fn default_anonymous_email() -> String {
    "anonymous@six-cities.local".to_string()
}

fn default_anonymous_name() -> String {
    "Anonymous".to_string()
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingSettings {
    /// Level or filter directive.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `json` or `pretty`.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
