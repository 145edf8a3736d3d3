//! Authentication-related models

use crate::models::user::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Persisted refresh token record, keyed by the token value
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct RefreshToken {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshToken {
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// Expired strictly after `expires_at`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 254))]
    pub email: String,
    #[validate(length(min = 1, max = 1024))]
    pub password: String,
}

/// Access + refresh token pair handed out at login
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
}

/// Access token minted from a refresh token
#[derive(Debug, Clone)]
pub struct AccessGrant {
    pub access_token: String,
    pub expires_in: u64,
}

/// Login response: the user profile plus both tokens
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: User,
    pub token: String,
    pub refresh_token: String,
    pub expires_in: u64,
}

impl From<Session> for LoginResponse {
    fn from(session: Session) -> Self {
        Self {
            user: session.user,
            token: session.access_token,
            refresh_token: session.refresh_token,
            expires_in: session.expires_in,
        }
    }
}

/// Token refresh response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub token: String,
    pub expires_in: u64,
}

impl From<AccessGrant> for RefreshResponse {
    fn from(grant: AccessGrant) -> Self {
        Self {
            token: grant.access_token,
            expires_in: grant.expires_in,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(now: DateTime<Utc>) -> RefreshToken {
        RefreshToken {
            token: "ab".repeat(32),
            user_id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            expires_at: now + Duration::days(60),
            revoked_at: None,
        }
    }

    #[test]
    fn test_expiry_is_strict() {
        let now = Utc::now();
        let token = record(now);

        assert!(!token.is_expired_at(now));
        assert!(!token.is_expired_at(token.expires_at));
        assert!(token.is_expired_at(token.expires_at + Duration::seconds(1)));
    }

    #[test]
    fn test_login_request_validation() {
        let ok = LoginRequest {
            email: "saul@bettercall.com".to_string(),
            password: "123456".to_string(),
        };
        assert!(ok.validate().is_ok());

        let empty = LoginRequest {
            email: String::new(),
            password: String::new(),
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_login_response_carries_profile() {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: "walt@breakingbad.com".to_string(),
            created_at: now,
            updated_at: now,
            is_chirpy_red: true,
        };
        let response = LoginResponse::from(Session {
            user: user.clone(),
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            expires_in: 3600,
        });

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["id"], user.id.to_string());
        assert_eq!(json["email"], "walt@breakingbad.com");
        assert_eq!(json["is_chirpy_red"], true);
        assert!(json["created_at"].is_string());
        assert!(json["updated_at"].is_string());
        assert_eq!(json["token"], "access");
        assert_eq!(json["refresh_token"], "refresh");
    }
}
