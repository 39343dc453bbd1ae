//! HS256 token signing and verification.

use crate::claims::{TokenClaims, TokenSubject};
use crate::error::TokenError;
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::fmt;

/// Signs and verifies identity tokens with a process-wide HMAC secret.
///
/// The service holds no mutable state; share it behind an `Arc`.
/// Expiry is checked against an explicit clock so that [`verify_at`](Self::verify_at)
/// can be driven from tests; [`verify`](Self::verify) uses the system clock.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// The only accepted signature algorithm.
    pub const ALGORITHM: Algorithm = Algorithm::HS256;

    /// Creates a service from the signing secret.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::MissingSecret`] when the secret is empty.
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, TokenError> {
        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }

        let mut validation = Validation::new(Self::ALGORITHM);
        // exp is compared against the caller-supplied clock in verify_at
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "iat", "exp"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        })
    }

    /// Signs `subject`, issued now and valid for 24 hours.
    pub fn sign(&self, subject: &TokenSubject) -> Result<String, TokenError> {
        self.sign_at(subject, Utc::now())
    }

    /// Signs `subject` with an explicit issue time.
    pub fn sign_at(
        &self,
        subject: &TokenSubject,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = TokenClaims::issue(subject, issued_at);
        jsonwebtoken::encode(&Header::new(Self::ALGORITHM), &claims, &self.encoding)
            .map_err(TokenError::Signing)
    }

    /// Verifies `token` against the system clock.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verifies `token` as of `now`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidToken`] when the token is malformed, was
    /// signed with another key or algorithm, does not carry a 24h window, or
    /// `now >= exp`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, TokenError> {
        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| TokenError::invalid(e.to_string()))?;
        let claims = data.claims;

        if !claims.has_standard_window() {
            return Err(TokenError::invalid("unexpected validity window"));
        }
        if claims.is_expired_at(now) {
            tracing::debug!(sub = claims.subject(), "rejecting expired token");
            return Err(TokenError::invalid("token expired"));
        }

        Ok(claims)
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &Self::ALGORITHM)
            .finish_non_exhaustive()
    }
}
