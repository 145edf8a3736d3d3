//! 用户服务：注册、凭据更新与会员升级

use crate::{
    auth::{error::AuthError, password::PasswordHasher},
    config::SecurityConfig,
    error::AppError,
    models::user::{User, UserWrite},
    repository::{with_timeout, UserRepository},
};
use std::sync::Arc;
use uuid::Uuid;

pub struct UserService {
    users: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
    storage_timeout: std::time::Duration,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: PasswordHasher,
        storage_timeout: std::time::Duration,
    ) -> Self {
        Self {
            users,
            hasher,
            storage_timeout,
        }
    }

    pub fn from_config(
        config: &SecurityConfig,
        users: Arc<dyn UserRepository>,
    ) -> Result<Self, AuthError> {
        config
            .validate()
            .map_err(|e| AuthError::Config(e.to_string()))?;

        Ok(Self::new(
            users,
            PasswordHasher::from_config(config)?,
            std::time::Duration::from_secs(config.storage_timeout_secs),
        ))
    }

    /// 注册新用户
    pub async fn register(&self, email: &str, password: &str) -> Result<User, AppError> {
        let hashed = self.hash_password(password).await?;

        match with_timeout(self.storage_timeout, self.users.create(email, &hashed)).await? {
            UserWrite::Saved(user) => {
                tracing::info!(user_id = %user.id, "User registered");
                Ok(user)
            }
            UserWrite::EmailTaken => Err(AppError::Conflict("Email already registered".to_string())),
            UserWrite::NotFound => Err(AppError::Internal("user insert returned no row".to_string())),
        }
    }

    /// 更新已认证用户的邮箱与密码
    pub async fn update_credentials(
        &self,
        user_id: Uuid,
        email: &str,
        password: &str,
    ) -> Result<User, AppError> {
        let hashed = self.hash_password(password).await?;

        let outcome = with_timeout(
            self.storage_timeout,
            self.users.update_credentials(user_id, email, &hashed),
        )
        .await?;

        match outcome {
            UserWrite::Saved(user) => {
                tracing::info!(%user_id, "User credentials updated");
                Ok(user)
            }
            UserWrite::EmailTaken => Err(AppError::Conflict("Email already registered".to_string())),
            // 令牌有效但账户已不存在
            UserWrite::NotFound => Err(AuthError::UnknownSubject.into()),
        }
    }

    /// 升级为 Chirpy Red 会员
    pub async fn upgrade_to_chirpy_red(&self, user_id: Uuid) -> Result<(), AppError> {
        let found = with_timeout(
            self.storage_timeout,
            self.users.upgrade_to_chirpy_red(user_id),
        )
        .await?;

        if !found {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        tracing::info!(%user_id, "User upgraded to Chirpy Red");
        Ok(())
    }

    async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::HashingFailure(format!("hashing task failed: {}", e)))?
    }
}
