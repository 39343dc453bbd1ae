//! Layered configuration loading.
//!
//! Later layers override earlier ones:
//!
//! 1. serde defaults
//! 2. a TOML or JSON file (or string)
//! 3. environment variables `PREFIX__SECTION__KEY`, optionally seeded from `.env`

use std::env;
use std::fs;
use std::path::Path;

use crate::{AppConfig, ConfigError};

/// Builds an [`AppConfig`] from defaults, files and the environment.
///
/// ```no_run
/// use sixcities_config::ConfigLoader;
///
/// # fn main() -> Result<(), sixcities_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_optional_file("config.toml")?
///     .with_dotenv()?
///     .with_env_prefix("SIXCITIES")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config: AppConfig,
    env_prefix: Option<String>,
}

impl ConfigLoader {
    /// Starts from defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the configuration with the contents of `path`.
    ///
    /// The format follows the extension: `.toml` or `.json`.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;

        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_string();
        self.config = parse(&content, &format)?;
        Ok(self)
    }

    /// Like [`with_file`](Self::with_file), but a missing file is not an error.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Replaces the configuration with `content` in `format` (`toml` or `json`).
    ///
    /// ```
    /// use sixcities_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string(
    ///         r#"
    ///         [auth]
    ///         jwt_secret = "secret"
    ///         salt = "salt"
    ///         "#,
    ///         "toml",
    ///     )
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.auth.jwt_secret, "secret");
    /// ```
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.config = parse(content, format)?;
        Ok(self)
    }

    /// Loads `.env` from the working directory into the process environment.
    ///
    /// A missing `.env` file is ignored.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if e.not_found() => Ok(self),
            Err(e) => Err(e.into()),
        }
    }

    /// Enables environment overrides such as `SIXCITIES__AUTH__JWT_SECRET`.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Applies environment overrides and validates.
    pub fn load(mut self) -> Result<AppConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            let vars: Vec<(String, String)> = env::vars()
                .filter(|(key, _)| key.starts_with(&prefix))
                .collect();
            for (key, value) in vars {
                self.apply_env_var(&key, &value, &prefix)?;
            }
        }

        self.config.validate()?;
        Ok(self.config)
    }

    /// Returns the configuration without environment overrides or validation.
    #[must_use]
    pub fn load_unvalidated(self) -> AppConfig {
        self.config
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        let Some(rest) = key.strip_prefix(prefix).and_then(|k| k.strip_prefix("__")) else {
            // e.g. SIXCITIES_HOME: shares the prefix but is not an override
            return Ok(());
        };

        let parts: Vec<&str> = rest.split("__").collect();
        let config = &mut self.config;

        match parts.as_slice() {
            ["SERVER", "HTTP_ADDR"] => config.server.http_addr = value.to_string(),
            ["SERVER", "REQUEST_TIMEOUT_SECS"] => {
                config.server.request_timeout_secs = parse_number(key, value)?;
            }
            ["SERVER", "MAX_BODY_SIZE"] => {
                config.server.max_body_size = parse_number(key, value)?;
            }
            ["SERVER", "SHUTDOWN_TIMEOUT_SECS"] => {
                config.server.shutdown_timeout_secs = parse_number(key, value)?;
            }

            ["AUTH", "JWT_SECRET"] => config.auth.jwt_secret = value.to_string(),
            ["AUTH", "SALT"] => config.auth.salt = value.to_string(),

            ["STORAGE", "UPLOAD_DIRECTORY"] => {
                config.storage.upload_directory = value.to_string();
            }

            ["ANONYMOUS", "EMAIL"] => config.anonymous.email = value.to_string(),
            ["ANONYMOUS", "NAME"] => config.anonymous.name = value.to_string(),

            ["LOGGING", "LEVEL"] => config.logging.level = value.to_string(),
            ["LOGGING", "FORMAT"] => {
                config.logging.format = value
                    .parse()
                    .map_err(|reason: String| ConfigError::env_parse_error(key, reason))?;
            }

            _ => {}
        }

        Ok(())
    }
}

fn parse(content: &str, format: &str) -> Result<AppConfig, ConfigError> {
    match format.to_ascii_lowercase().as_str() {
        "toml" => Ok(toml::from_str(content)?),
        "json" => Ok(serde_json::from_str(content)?),
        other => Err(ConfigError::UnsupportedFormat(other.to_string())),
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::env_parse_error(key, "expected integer"))
}
