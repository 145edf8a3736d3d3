//! Access token issuance and verification
//!
//! Access tokens are HS256 JWTs carrying only `iss`, `sub`, `iat` and `exp`.
//! They are verified without touching storage and cannot be revoked; their
//! short lifetime is the only bound on a leaked token.

use crate::{
    auth::error::AuthError,
    config::{SecurityConfig, DEFAULT_TOKEN_ISSUER},
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Issuer used for access tokens unless configured otherwise
pub const ACCESS_TOKEN_ISSUER: &str = DEFAULT_TOKEN_ISSUER;

/// Minimum HS256 secret length in bytes
pub const MIN_SECRET_LEN: usize = 32;

/// JWT claims for access tokens
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Issuer (token class)
    pub iss: String,

    /// Subject (user ID)
    pub sub: String,

    /// Issued at
    pub iat: i64,

    /// Expiration
    pub exp: i64,
}

/// Stateless access token codec
pub struct AccessTokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    ttl: Duration,
}

impl AccessTokenCodec {
    pub fn new(secret: &Secret<String>, ttl: Duration) -> Result<Self, AuthError> {
        Self::with_issuer(secret, ttl, ACCESS_TOKEN_ISSUER)
    }

    pub fn with_issuer(
        secret: &Secret<String>,
        ttl: Duration,
        issuer: &str,
    ) -> Result<Self, AuthError> {
        let secret = secret.expose_secret();

        if secret.len() < MIN_SECRET_LEN {
            return Err(AuthError::Config(format!(
                "JWT secret too short (min {} chars)",
                MIN_SECRET_LEN
            )));
        }

        if ttl <= Duration::zero() {
            return Err(AuthError::Config("Access token TTL must be positive".to_string()));
        }

        // The library only checks the signature; issuer and expiry are checked
        // below so that their order is fixed.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims = HashSet::new();

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            issuer: issuer.to_string(),
            ttl,
        })
    }

    /// Create codec from config
    pub fn from_config(config: &SecurityConfig) -> Result<Self, AuthError> {
        Self::with_issuer(
            &config.jwt_secret,
            config.access_token_ttl()?,
            &config.token_issuer,
        )
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue an access token for `user_id` valid from now
    pub fn issue(&self, user_id: Uuid) -> Result<String, AuthError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issue an access token as if the current time were `now`
    pub fn issue_at(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<String, AuthError> {
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AuthError::Config("Access token expiry out of range".to_string()))?;

        let claims = Claims {
            iss: self.issuer.clone(),
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode access token: {:?}", e);
            AuthError::Config(format!("Failed to encode access token: {}", e))
        })
    }

    /// Verify an access token and return its subject
    pub fn verify(&self, token: &str) -> Result<Uuid, AuthError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify an access token against the clock value `now`
    ///
    /// Checks run in a fixed order: structure and signature, issuer, expiry,
    /// then the subject. No claim is looked at before the signature holds.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Uuid, AuthError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!("Token decoding failed: {:?}", e);
                match e.kind() {
                    ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                        AuthError::InvalidSignature
                    }
                    _ => AuthError::MalformedToken,
                }
            })?
            .claims;

        if claims.iss != self.issuer {
            tracing::debug!(expected = %self.issuer, got = %claims.iss, "Token issuer mismatch");
            return Err(AuthError::IssuerMismatch);
        }

        if now.timestamp() >= claims.exp {
            return Err(AuthError::ExpiredToken);
        }

        Uuid::parse_str(&claims.sub).map_err(|_| AuthError::MalformedToken)
    }
}
