//! Refresh token repository (刷新令牌数据访问)

use crate::{auth::error::AuthError, models::auth::RefreshToken};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Persistence seam for refresh token records
///
/// Each method is a single-record operation; implementations must make it
/// atomic so a revoke is never lost to a concurrent read.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    /// 存储刷新令牌
    async fn insert(&self, token: &RefreshToken) -> Result<(), AuthError>;

    /// 按令牌值精确查找
    async fn find(&self, token: &str) -> Result<Option<RefreshToken>, AuthError>;

    /// 设置 revoked_at（已撤销时保持原值）
    ///
    /// Returns `false` when no record has this token.
    async fn mark_revoked(&self, token: &str, at: DateTime<Utc>) -> Result<bool, AuthError>;
}

pub struct PgRefreshTokenRepository {
    db: PgPool,
}

impl PgRefreshTokenRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RefreshTokenRepository for PgRefreshTokenRepository {
    async fn insert(&self, token: &RefreshToken) -> Result<(), AuthError> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (token, user_id, created_at, updated_at, expires_at, revoked_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&token.token)
        .bind(token.user_id)
        .bind(token.created_at)
        .bind(token.updated_at)
        .bind(token.expires_at)
        .bind(token.revoked_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn find(&self, token: &str) -> Result<Option<RefreshToken>, AuthError> {
        let record = sqlx::query_as::<_, RefreshToken>(
            r#"
            SELECT token, user_id, created_at, updated_at, expires_at, revoked_at
            FROM refresh_tokens
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.db)
        .await?;

        Ok(record)
    }

    async fn mark_revoked(&self, token: &str, at: DateTime<Utc>) -> Result<bool, AuthError> {
        // SET 右侧读取的是更新前的值，已撤销的记录保持原时间戳
        let result = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET revoked_at = COALESCE(revoked_at, $2),
                updated_at = CASE WHEN revoked_at IS NULL THEN $2 ELSE updated_at END
            WHERE token = $1
            "#,
        )
        .bind(token)
        .bind(at)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// In-process store, used by tests and single-node development setups
#[derive(Default)]
pub struct InMemoryRefreshTokenRepository {
    tokens: RwLock<HashMap<String, RefreshToken>>,
}

impl InMemoryRefreshTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tokens.read().await.is_empty()
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRefreshTokenRepository {
    async fn insert(&self, token: &RefreshToken) -> Result<(), AuthError> {
        let mut tokens = self.tokens.write().await;
        if tokens.contains_key(&token.token) {
            return Err(AuthError::Storage("duplicate refresh token".to_string()));
        }
        tokens.insert(token.token.clone(), token.clone());
        Ok(())
    }

    async fn find(&self, token: &str) -> Result<Option<RefreshToken>, AuthError> {
        Ok(self.tokens.read().await.get(token).cloned())
    }

    async fn mark_revoked(&self, token: &str, at: DateTime<Utc>) -> Result<bool, AuthError> {
        let mut tokens = self.tokens.write().await;
        match tokens.get_mut(token) {
            Some(record) => {
                if record.revoked_at.is_none() {
                    record.revoked_at = Some(at);
                    record.updated_at = at;
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
