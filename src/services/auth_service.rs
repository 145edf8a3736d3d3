//! 认证服务：登录、请求认证、令牌刷新与撤销

use crate::{
    auth::{
        api_key::ApiKey,
        error::AuthError,
        header::{extract_api_key, extract_bearer},
        jwt::AccessTokenCodec,
        password::PasswordHasher,
        refresh::RefreshTokenStore,
    },
    config::SecurityConfig,
    error::AppError,
    models::auth::{AccessGrant, Session},
    repository::{with_timeout, RefreshTokenRepository, UserRepository},
};
use std::sync::Arc;
use uuid::Uuid;

/// Hashed once at construction and verified against when the email is
/// unknown, so that path costs one Argon2 run like a wrong password does.
const DUMMY_PASSWORD: &str = "chirpy-dummy-password";

pub struct AuthService {
    codec: Arc<AccessTokenCodec>,
    refresh_tokens: RefreshTokenStore,
    hasher: PasswordHasher,
    users: Arc<dyn UserRepository>,
    webhook_key: Option<ApiKey>,
    dummy_hash: Arc<str>,
    storage_timeout: std::time::Duration,
}

impl AuthService {
    pub fn new(
        codec: Arc<AccessTokenCodec>,
        refresh_tokens: RefreshTokenStore,
        hasher: PasswordHasher,
        users: Arc<dyn UserRepository>,
        webhook_key: Option<ApiKey>,
        storage_timeout: std::time::Duration,
    ) -> Result<Self, AuthError> {
        let dummy_hash = hasher.hash(DUMMY_PASSWORD)?;

        Ok(Self {
            codec,
            refresh_tokens,
            hasher,
            users,
            webhook_key,
            dummy_hash: Arc::from(dummy_hash),
            storage_timeout,
        })
    }

    /// Wire every component from the security config
    pub fn from_config(
        config: &SecurityConfig,
        users: Arc<dyn UserRepository>,
        refresh_repo: Arc<dyn RefreshTokenRepository>,
    ) -> Result<Self, AuthError> {
        config
            .validate()
            .map_err(|e| AuthError::Config(e.to_string()))?;

        Self::new(
            Arc::new(AccessTokenCodec::from_config(config)?),
            RefreshTokenStore::from_config(refresh_repo, config)?,
            PasswordHasher::from_config(config)?,
            users,
            config.webhook_api_key.clone().map(ApiKey::new),
            std::time::Duration::from_secs(config.storage_timeout_secs),
        )
    }

    pub fn codec(&self) -> &AccessTokenCodec {
        &self.codec
    }

    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    /// Authenticate a request from its `Authorization` header value
    pub async fn authenticate_request(&self, header_value: &str) -> Result<Uuid, AppError> {
        let token = extract_bearer(header_value)?;
        Ok(self.codec.verify(token)?)
    }

    /// 用户登录
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AppError> {
        let credentials = with_timeout(
            self.storage_timeout,
            self.users.find_credentials_by_email(email),
        )
        .await?;

        let stored_hash = credentials.as_ref().map(|c| c.hashed_password.clone());
        self.verify_password(password, stored_hash).await?;

        let user = credentials.ok_or(AuthError::UnknownSubject)?.into_user();

        let access_token = self.codec.issue(user.id)?;
        let refresh_token = self.refresh_tokens.create(user.id).await?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(Session {
            user,
            access_token,
            refresh_token: refresh_token.token,
            expires_in: self.codec.ttl().num_seconds() as u64,
        })
    }

    /// 用刷新令牌换取新的访问令牌（刷新令牌本身不轮换）
    pub async fn refresh(&self, header_value: &str) -> Result<AccessGrant, AppError> {
        let token = extract_bearer(header_value)?;
        let user_id = self.refresh_tokens.resolve(token).await?;
        let access_token = self.codec.issue(user_id)?;

        tracing::debug!(%user_id, "Access token refreshed");

        Ok(AccessGrant {
            access_token,
            expires_in: self.codec.ttl().num_seconds() as u64,
        })
    }

    /// 撤销刷新令牌
    pub async fn revoke(&self, header_value: &str) -> Result<(), AppError> {
        let token = extract_bearer(header_value)?;
        self.refresh_tokens.revoke(token).await?;

        tracing::info!("Refresh token revoked");
        Ok(())
    }

    /// Authenticate the webhook caller by its static API key
    pub async fn authenticate_webhook(&self, header_value: &str) -> Result<(), AppError> {
        let provided = extract_api_key(header_value)?;

        match &self.webhook_key {
            Some(key) => Ok(key.verify(provided)?),
            None => {
                tracing::warn!("Webhook API key not configured, rejecting request");
                Err(AuthError::MalformedCredential.into())
            }
        }
    }

    /// Argon2 is CPU bound; run it off the async workers
    async fn verify_password(
        &self,
        password: &str,
        stored_hash: Option<String>,
    ) -> Result<(), AuthError> {
        let hasher = self.hasher.clone();
        let dummy_hash = self.dummy_hash.clone();
        let password = password.to_string();

        tokio::task::spawn_blocking(move || {
            let hash = stored_hash.as_deref().unwrap_or(&*dummy_hash);
            hasher.verify(&password, hash)
        })
        .await
        .map_err(|e| AuthError::HashingFailure(format!("verification task failed: {}", e)))?
    }
}
