//! User repository (数据库访问层)
//!
//! Login reads credentials by email; registration, credential updates and
//! the membership upgrade are the only writes. Email uniqueness is enforced
//! by the store, never by a separate read.

use crate::{
    auth::error::AuthError,
    models::user::{User, UserCredentials, UserWrite},
};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 根据邮箱查找登录凭据
    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, AuthError>;

    /// 创建用户；邮箱已存在时返回 `EmailTaken`
    async fn create(&self, email: &str, hashed_password: &str) -> Result<UserWrite, AuthError>;

    /// 更新邮箱与密码哈希
    async fn update_credentials(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<UserWrite, AuthError>;

    /// 标记为 Chirpy Red 会员；用户不存在时返回 `false`
    async fn upgrade_to_chirpy_red(&self, id: Uuid) -> Result<bool, AuthError>;
}

pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, AuthError> {
        let credentials = sqlx::query_as::<_, UserCredentials>(
            r#"
            SELECT id, email, hashed_password, created_at, updated_at, is_chirpy_red
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        Ok(credentials)
    }

    async fn create(&self, email: &str, hashed_password: &str) -> Result<UserWrite, AuthError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, hashed_password, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            ON CONFLICT (email) DO NOTHING
            RETURNING id, email, created_at, updated_at, is_chirpy_red
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(hashed_password)
        .fetch_optional(&self.db)
        .await?;

        Ok(user.map_or(UserWrite::EmailTaken, UserWrite::Saved))
    }

    async fn update_credentials(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<UserWrite, AuthError> {
        let result = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET email = $2, hashed_password = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, created_at, updated_at, is_chirpy_red
            "#,
        )
        .bind(id)
        .bind(email)
        .bind(hashed_password)
        .fetch_optional(&self.db)
        .await;

        match result {
            Ok(Some(user)) => Ok(UserWrite::Saved(user)),
            Ok(None) => Ok(UserWrite::NotFound),
            Err(e) if is_unique_violation(&e) => Ok(UserWrite::EmailTaken),
            Err(e) => Err(e.into()),
        }
    }

    async fn upgrade_to_chirpy_red(&self, id: Uuid) -> Result<bool, AuthError> {
        let result = sqlx::query(
            "UPDATE users SET is_chirpy_red = TRUE, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// In-process store keyed by user id
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, (User, String)>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user, failing on a taken email
    pub async fn insert(&self, email: &str, hashed_password: &str) -> Result<User, AuthError> {
        match self.create(email, hashed_password).await? {
            UserWrite::Saved(user) => Ok(user),
            _ => Err(AuthError::Storage(format!("email already registered: {}", email))),
        }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Option<User> {
        self.users.read().await.get(&id).map(|(user, _)| user.clone())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, AuthError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|(user, _)| user.email == email)
            .map(|(user, hashed_password)| UserCredentials {
                id: user.id,
                email: user.email.clone(),
                hashed_password: hashed_password.clone(),
                created_at: user.created_at,
                updated_at: user.updated_at,
                is_chirpy_red: user.is_chirpy_red,
            }))
    }

    async fn create(&self, email: &str, hashed_password: &str) -> Result<UserWrite, AuthError> {
        let mut users = self.users.write().await;
        if users.values().any(|(user, _)| user.email == email) {
            return Ok(UserWrite::EmailTaken);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            created_at: now,
            updated_at: now,
            is_chirpy_red: false,
        };
        users.insert(user.id, (user.clone(), hashed_password.to_string()));

        Ok(UserWrite::Saved(user))
    }

    async fn update_credentials(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<UserWrite, AuthError> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|(user, _)| user.email == email && user.id != id)
        {
            return Ok(UserWrite::EmailTaken);
        }

        match users.get_mut(&id) {
            Some((user, hash)) => {
                user.email = email.to_string();
                user.updated_at = Utc::now();
                *hash = hashed_password.to_string();
                Ok(UserWrite::Saved(user.clone()))
            }
            None => Ok(UserWrite::NotFound),
        }
    }

    async fn upgrade_to_chirpy_red(&self, id: Uuid) -> Result<bool, AuthError> {
        match self.users.write().await.get_mut(&id) {
            Some((user, _)) => {
                user.is_chirpy_red = true;
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
