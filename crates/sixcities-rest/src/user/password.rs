//! Salted SHA-256 password digests.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Hex digest of `salt` followed by `password`.
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Whether `candidate` hashes to `digest` under `salt`.
///
/// Compared in constant time; a digest of another length never matches.
pub fn verify_password(candidate: &str, salt: &str, digest: &str) -> bool {
    let computed = hash_password(candidate, salt);
    computed.as_bytes().ct_eq(digest.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digest() {
        // sha256("salt" + "password")
        assert_eq!(
            hash_password("password", "salt"),
            "13601bda4ea78e55a07b98866d2be6be0744e3866f13c00c811cab608a28f322"
        );
    }

    #[test]
    fn test_verify() {
        let digest = hash_password("s3cret", "pepper");
        assert!(verify_password("s3cret", "pepper", &digest));
        assert!(!verify_password("s3cret!", "pepper", &digest));
        assert!(!verify_password("s3cret", "other", &digest));
        assert!(!verify_password("s3cret", "pepper", ""));
        assert!(!verify_password("s3cret", "pepper", &digest[..32]));
        assert!(!verify_password("s3cret", "pepper", &format!("{digest}00")));
    }
}
