//! User domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// The slice of a user account the auth core reads at login
///
/// Not `Serialize`, and `Debug` redacts the hash.
#[derive(Clone, sqlx::FromRow)]
pub struct UserCredentials {
    pub id: Uuid,
    pub email: String,
    pub hashed_password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_chirpy_red: bool,
}

impl UserCredentials {
    /// Drop the hash, keeping the public profile
    pub fn into_user(self) -> User {
        User {
            id: self.id,
            email: self.email,
            created_at: self.created_at,
            updated_at: self.updated_at,
            is_chirpy_red: self.is_chirpy_red,
        }
    }
}

impl std::fmt::Debug for UserCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserCredentials")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("hashed_password", &"[REDACTED]")
            .field("is_chirpy_red", &self.is_chirpy_red)
            .finish()
    }
}

/// 用户公开信息（不含密码哈希）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_chirpy_red: bool,
}

/// Outcome of a write that must keep emails unique
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserWrite {
    Saved(User),
    EmailTaken,
    NotFound,
}

/// 注册 / 更新凭据请求
#[derive(Debug, Deserialize, Validate)]
pub struct CredentialsRequest {
    #[validate(email, length(max = 254))]
    pub email: String,
    #[validate(length(min = 1, max = 1024))]
    pub password: String,
}

/// Payment provider webhook body
#[derive(Debug, Deserialize)]
pub struct PolkaWebhook {
    pub event: String,
    pub data: PolkaWebhookData,
}

#[derive(Debug, Deserialize)]
pub struct PolkaWebhookData {
    pub user_id: String,
}

/// The only webhook event that changes state
pub const USER_UPGRADED_EVENT: &str = "user.upgraded";
