//! Signed claim set.

use crate::identity::{Identity, UserType};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Validity window of every issued token, in seconds (24 hours).
pub const TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

/// Identity fields submitted for signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    /// User identifier, becomes the `sub` claim.
    pub id: String,
    /// User email.
    pub email: String,
    /// User display name.
    pub name: String,
    /// Account tier.
    pub user_type: UserType,
}

impl TokenSubject {
    /// Creates a subject.
    pub fn new(
        id: impl Into<String>,
        email: impl Into<String>,
        name: impl Into<String>,
        user_type: UserType,
    ) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name: name.into(),
            user_type,
        }
    }
}

/// Claims carried by a signed token.
///
/// Timestamps are Unix seconds on the wire. `exp` is always
/// `iat + TOKEN_TTL_SECS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    sub: String,
    email: String,
    name: String,
    #[serde(rename = "type")]
    user_type: UserType,
    iat: i64,
    exp: i64,
}

impl TokenClaims {
    pub(crate) fn issue(subject: &TokenSubject, issued_at: DateTime<Utc>) -> Self {
        let iat = issued_at.timestamp();
        Self {
            sub: subject.id.clone(),
            email: subject.email.clone(),
            name: subject.name.clone(),
            user_type: subject.user_type,
            iat,
            exp: iat + TOKEN_TTL_SECS,
        }
    }

    /// The token subject (user identifier).
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.sub
    }

    /// When the token was issued, truncated to whole seconds.
    #[must_use]
    pub fn issued_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.iat, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// When the token stops being valid.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// `true` when `exp - iat` is exactly the fixed validity window.
    pub(crate) fn has_standard_window(&self) -> bool {
        self.expires_at() - self.issued_at() == Duration::seconds(TOKEN_TTL_SECS)
    }

    /// Verification fails once `now` reaches `exp`.
    pub(crate) fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }

    /// The verified caller described by these claims.
    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity::new(
            self.sub.clone(),
            self.email.clone(),
            self.name.clone(),
            self.user_type,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject() -> TokenSubject {
        TokenSubject::new("507f1f77bcf86cd799439011", "k@x.io", "Keller", UserType::Pro)
    }

    #[test]
    fn test_issue_sets_24h_window() {
        let issued_at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let claims = TokenClaims::issue(&subject(), issued_at);

        assert_eq!(claims.issued_at(), issued_at);
        assert_eq!(claims.expires_at(), issued_at + Duration::hours(24));
        assert!(claims.has_standard_window());
    }

    #[test]
    fn test_expiry_boundary_is_exclusive() {
        let issued_at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let claims = TokenClaims::issue(&subject(), issued_at);

        assert!(!claims.is_expired_at(claims.expires_at() - Duration::seconds(1)));
        assert!(claims.is_expired_at(claims.expires_at()));
    }

    #[test]
    fn test_wire_names() {
        let issued_at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let json = serde_json::to_value(TokenClaims::issue(&subject(), issued_at)).unwrap();

        assert_eq!(json["sub"], "507f1f77bcf86cd799439011");
        assert_eq!(json["type"], "pro");
        assert_eq!(json["iat"], 1_700_000_000_i64);
        assert_eq!(json["exp"], 1_700_086_400_i64);
    }

    #[test]
    fn test_identity_copies_subject_fields() {
        let claims = TokenClaims::issue(&subject(), Utc::now());
        let identity = claims.identity();

        assert_eq!(identity.id(), "507f1f77bcf86cd799439011");
        assert_eq!(identity.email(), "k@x.io");
        assert_eq!(identity.name(), "Keller");
        assert_eq!(identity.user_type(), UserType::Pro);
    }
}
