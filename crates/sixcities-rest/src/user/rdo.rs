//! User response projections.

use super::service::User;
use serde::Serialize;
use sixcities_auth::UserType;

/// Public view of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRdo {
    /// Entity id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Email.
    pub email: String,
    /// Stored avatar file name; empty when unset.
    pub avatar: String,
    /// Account tier.
    #[serde(rename = "type")]
    pub user_type: UserType,
}

impl From<&User> for UserRdo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            avatar: user.avatar.clone(),
            user_type: user.user_type,
        }
    }
}

/// Response of a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoggedUserRdo {
    /// Signed bearer token.
    pub token: String,
    /// Email.
    pub email: String,
    /// Avatar file name.
    pub avatar: String,
    /// Display name.
    pub name: String,
    /// Account tier.
    #[serde(rename = "type")]
    pub user_type: UserType,
}
