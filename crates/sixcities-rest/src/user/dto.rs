//! User request payloads.

use serde::Deserialize;
use sixcities_auth::UserType;
use sixcities_core::{AppError, AppResult};

/// Body of `POST /users/register`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserDto {
    /// Display name.
    pub name: String,
    /// Login email; unique.
    pub email: String,
    /// Plain-text password; only its digest is stored.
    pub password: String,
    /// Account tier.
    #[serde(rename = "type", default)]
    pub user_type: UserType,
}

impl CreateUserDto {
    /// Rejects blank names, malformed emails and empty passwords.
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::bad_request("name must not be empty"));
        }
        if !looks_like_email(&self.email) {
            return Err(AppError::bad_request(format!(
                "email \"{}\" is not valid",
                self.email
            )));
        }
        if self.password.is_empty() {
            return Err(AppError::bad_request("password must not be empty"));
        }
        Ok(())
    }
}

/// Body of `POST /users/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginUserDto {
    /// Login email.
    pub email: String,
    /// Plain-text password.
    pub password: String,
}

fn looks_like_email(email: &str) -> bool {
    match email.trim().split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.contains('@'),
        None => false,
    }
}
