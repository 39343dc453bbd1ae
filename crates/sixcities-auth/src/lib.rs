//! # Six Cities Auth
//!
//! Stateless token-based authentication for the six cities REST service.
//!
//! - [`TokenService`] - HS256 signing and verification with a fixed 24h validity window
//! - [`TokenClaims`] - The signed claim set (`sub`, `email`, `name`, `type`, `iat`, `exp`)
//! - [`TokenSubject`] - The identity fields a caller asks to have signed
//! - [`Identity`] - The verified caller, only obtainable from verified claims
//!
//! # Example
//!
//! ```
//! use sixcities_auth::{TokenService, TokenSubject, UserType};
//!
//! let tokens = TokenService::new("change-me").unwrap();
//! let subject = TokenSubject::new("65a1f0c2e4b0a1b2c3d4e5f6", "ann@example.com", "Ann", UserType::Pro);
//!
//! let token = tokens.sign(&subject).unwrap();
//! let identity = tokens.verify(&token).unwrap().identity();
//! assert_eq!(identity.id(), "65a1f0c2e4b0a1b2c3d4e5f6");
//! ```

#![doc(html_root_url = "https://docs.rs/sixcities-auth/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod claims;
mod error;
mod identity;
mod token;

pub use claims::{TokenClaims, TokenSubject, TOKEN_TTL_SECS};
pub use error::TokenError;
pub use identity::{Identity, UserType};
pub use token::TokenService;
