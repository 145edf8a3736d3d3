//! Opaque refresh tokens
//!
//! Refresh tokens are 32 random bytes, hex encoded, with all state in storage.
//! A bare refresh only reads the record; the token is not rotated and stays
//! usable until it expires or is revoked.

use crate::{
    auth::error::AuthError,
    config::SecurityConfig,
    models::auth::RefreshToken,
    repository::{with_timeout, RefreshTokenRepository},
};
use chrono::{Duration, Utc};
use rand::{rngs::OsRng, RngCore};
use std::sync::Arc;
use uuid::Uuid;

/// Random bytes per refresh token
pub const REFRESH_TOKEN_BYTES: usize = 32;

pub struct RefreshTokenStore {
    repo: Arc<dyn RefreshTokenRepository>,
    ttl: Duration,
    storage_timeout: std::time::Duration,
}

impl RefreshTokenStore {
    pub fn new(
        repo: Arc<dyn RefreshTokenRepository>,
        ttl: Duration,
        storage_timeout: std::time::Duration,
    ) -> Result<Self, AuthError> {
        // 非正的有效期会让每个令牌一创建就过期
        if ttl <= Duration::zero() {
            return Err(AuthError::Config("Refresh token TTL must be positive".to_string()));
        }

        Ok(Self {
            repo,
            ttl,
            storage_timeout,
        })
    }

    pub fn from_config(
        repo: Arc<dyn RefreshTokenRepository>,
        config: &SecurityConfig,
    ) -> Result<Self, AuthError> {
        Self::new(
            repo,
            config.refresh_token_ttl()?,
            std::time::Duration::from_secs(config.storage_timeout_secs),
        )
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Generate a fresh opaque token (64 hex characters)
    pub fn generate() -> String {
        let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    /// Create and persist a refresh token for `user_id`
    pub async fn create(&self, user_id: Uuid) -> Result<RefreshToken, AuthError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AuthError::Config("Refresh token expiry out of range".to_string()))?;
        let record = RefreshToken {
            token: Self::generate(),
            user_id,
            created_at: now,
            updated_at: now,
            expires_at,
            revoked_at: None,
        };

        with_timeout(self.storage_timeout, self.repo.insert(&record)).await?;

        tracing::debug!(%user_id, expires_at = %record.expires_at, "Refresh token created");
        Ok(record)
    }

    /// Resolve a refresh token to its owner
    pub async fn resolve(&self, token: &str) -> Result<Uuid, AuthError> {
        let record = with_timeout(self.storage_timeout, self.repo.find(token))
            .await?
            .ok_or(AuthError::UnknownSubject)?;

        if record.is_revoked() {
            return Err(AuthError::RevokedToken);
        }

        if record.is_expired_at(Utc::now()) {
            return Err(AuthError::ExpiredToken);
        }

        Ok(record.user_id)
    }

    /// Revoke a refresh token; revoking twice is a no-op
    pub async fn revoke(&self, token: &str) -> Result<(), AuthError> {
        let found = with_timeout(
            self.storage_timeout,
            self.repo.mark_revoked(token, Utc::now()),
        )
        .await?;

        if !found {
            return Err(AuthError::UnknownSubject);
        }

        Ok(())
    }
}
