//! Static API key for the server-to-server webhook caller

use crate::auth::error::AuthError;
use rand::{rngs::OsRng, RngCore};
use secrecy::{ExposeSecret, Secret};
use sha2::{Digest, Sha256};

/// Pre-shared webhook key
pub struct ApiKey {
    expected: Secret<String>,
}

impl ApiKey {
    pub fn new(expected: Secret<String>) -> Self {
        Self { expected }
    }

    /// Generate a new key: 16 random bytes, hex encoded
    pub fn generate() -> String {
        let mut bytes = [0u8; 16];
        OsRng.fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    /// Compare a presented key with the configured one
    ///
    /// Both sides are reduced to SHA-256 digests first so the comparison
    /// always covers 32 bytes, then folded without an early exit. Neither the
    /// key length nor a matching prefix shows up in the timing.
    pub fn verify(&self, provided: &str) -> Result<(), AuthError> {
        let expected = Sha256::digest(self.expected.expose_secret().as_bytes());
        let provided = Sha256::digest(provided.as_bytes());

        let diff = expected
            .iter()
            .zip(provided.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b));

        if diff == 0 {
            Ok(())
        } else {
            Err(AuthError::MalformedCredential)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(value: &str) -> ApiKey {
        ApiKey::new(Secret::new(value.to_string()))
    }

    #[test]
    fn test_generate_api_key() {
        let generated = ApiKey::generate();
        assert_eq!(generated.len(), 32);
        assert!(generated.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(generated, ApiKey::generate());
    }

    #[test]
    fn test_verify_exact_match() {
        assert!(key("f271c81ff7084ee5b99a5091b42d486e")
            .verify("f271c81ff7084ee5b99a5091b42d486e")
            .is_ok());
    }

    #[test]
    fn test_verify_rejects_prefix_and_case() {
        let key = key("f271c81ff7084ee5b99a5091b42d486e");
        assert!(key.verify("f271c81ff7084ee5").is_err());
        assert!(key.verify("F271C81FF7084EE5B99A5091B42D486E").is_err());
        assert!(key.verify("f271c81ff7084ee5b99a5091b42d486e0").is_err());
        assert!(key.verify("").is_err());
    }
}
