//! The root configuration type.

use crate::schema::{
    AnonymousSettings, AuthSettings, LoggingSettings, ServerSettings, StorageSettings,
};
use crate::ConfigError;
use serde::{Deserialize, Serialize};
use sixcities_telemetry::LogConfig;
use std::net::SocketAddr;
use std::time::Duration;

/// Complete service configuration.
///
/// Every section has defaults except the secrets in [`AuthSettings`], which
/// [`validate`](Self::validate) requires.
///
/// ```
/// use sixcities_config::AppConfig;
///
/// let config = AppConfig::default();
/// assert_eq!(config.server.http_addr, "0.0.0.0:4000");
/// assert!(config.validate().is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// HTTP server.
    #[serde(default)]
    pub server: ServerSettings,

    /// Secrets.
    #[serde(default)]
    pub auth: AuthSettings,

    /// Upload storage.
    #[serde(default)]
    pub storage: StorageSettings,

    /// Anonymous caller.
    #[serde(default)]
    pub anonymous: AnonymousSettings,

    /// Logging.
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl AppConfig {
    /// Checks values that serde cannot.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt_secret.is_empty() {
            return Err(ConfigError::invalid_value(
                "auth.jwt_secret",
                "must not be empty",
            ));
        }

        if self.auth.salt.is_empty() {
            return Err(ConfigError::invalid_value("auth.salt", "must not be empty"));
        }

        if self.server.http_addr.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::invalid_value(
                "server.http_addr",
                format!("invalid socket address: {}", self.server.http_addr),
            ));
        }

        if self.server.max_body_size == 0 {
            return Err(ConfigError::invalid_value(
                "server.max_body_size",
                "must be greater than zero",
            ));
        }

        if self.storage.upload_directory.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "storage.upload_directory",
                "must not be empty",
            ));
        }

        if self.anonymous.email.is_empty() {
            return Err(ConfigError::invalid_value(
                "anonymous.email",
                "must not be empty",
            ));
        }

        Ok(())
    }

    /// Body-read timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }

    /// Shutdown grace period.
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.server.shutdown_timeout_secs)
    }

    /// Logging configuration for [`sixcities_telemetry::init_logging`].
    #[must_use]
    pub fn log_config(&self, service_name: &str) -> LogConfig {
        LogConfig {
            level: self.logging.level.clone(),
            format: self.logging.format,
            service_name: service_name.to_string(),
            include_location: matches!(self.logging.format, sixcities_telemetry::LogFormat::Pretty),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sixcities_telemetry::LogFormat;

    fn valid() -> AppConfig {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "secret".to_string();
        config.auth.salt = "salt".to_string();
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_empty_secret_rejected() {
        let mut config = valid();
        config.auth.jwt_secret.clear();

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "auth.jwt_secret"));
    }

    #[test]
    fn test_empty_salt_rejected() {
        let mut config = valid();
        config.auth.salt.clear();

        assert!(config.validate().unwrap_err().to_string().contains("auth.salt"));
    }

    #[test]
    fn test_bad_address_rejected() {
        let mut config = valid();
        config.server.http_addr = "localhost".to_string();

        assert!(config.validate().unwrap_err().to_string().contains("server.http_addr"));
    }

    #[test]
    fn test_blank_upload_directory_rejected() {
        let mut config = valid();
        config.storage.upload_directory = "  ".to_string();

        assert!(config
            .validate()
            .unwrap_err()
            .to_string()
            .contains("storage.upload_directory"));
    }

    #[test]
    fn test_log_config_follows_format() {
        let mut config = valid();
        config.logging.format = LogFormat::Pretty;
        config.logging.level = "debug".to_string();

        let log = config.log_config("six-cities");
        assert_eq!(log.level, "debug");
        assert_eq!(log.format, LogFormat::Pretty);
        assert!(log.include_location);
        assert_eq!(log.service_name, "six-cities");
    }

    #[test]
    fn test_durations() {
        let config = valid();
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(30));
    }
}
