//! Verified caller identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account tier of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    /// Regular account.
    #[default]
    Standard,
    /// Professional host account.
    Pro,
}

impl UserType {
    /// Wire name of this tier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Pro => "pro",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Self::Standard),
            "pro" => Ok(Self::Pro),
            other => Err(format!("unknown user type: {other}")),
        }
    }
}

/// The authenticated caller of one request.
///
/// An `Identity` can only be obtained from [`TokenClaims`](crate::TokenClaims)
/// that passed verification, so holding one proves the request carried a
/// valid token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    id: String,
    email: String,
    name: String,
    #[serde(rename = "type")]
    user_type: UserType,
}

impl Identity {
    pub(crate) fn new(id: String, email: String, name: String, user_type: UserType) -> Self {
        Self {
            id,
            email,
            name,
            user_type,
        }
    }

    /// The user identifier (the token subject).
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The user's email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// The user's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The user's account tier.
    #[must_use]
    pub const fn user_type(&self) -> UserType {
        self.user_type
    }
}
