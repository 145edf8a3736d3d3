//! Internal authentication error taxonomy
//!
//! These variants are precise on purpose and stay on the server side.
//! `crate::error::AppError` folds them into a single unauthorized outcome
//! before anything reaches a client.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("no credential supplied")]
    MissingCredential,

    #[error("credential has the wrong scheme or is empty")]
    MalformedCredential,

    #[error("token is structurally invalid")]
    MalformedToken,

    #[error("token signature does not verify")]
    InvalidSignature,

    #[error("token has expired")]
    ExpiredToken,

    #[error("token has been revoked")]
    RevokedToken,

    #[error("token issuer does not match")]
    IssuerMismatch,

    #[error("no subject matches the credential")]
    UnknownSubject,

    #[error("password does not match")]
    PasswordMismatch,

    #[error("password hashing failed: {0}")]
    HashingFailure(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl AuthError {
    /// Stable label used in logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::MissingCredential => "missing_credential",
            AuthError::MalformedCredential => "malformed_credential",
            AuthError::MalformedToken => "malformed_token",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::ExpiredToken => "expired_token",
            AuthError::RevokedToken => "revoked_token",
            AuthError::IssuerMismatch => "issuer_mismatch",
            AuthError::UnknownSubject => "unknown_subject",
            AuthError::PasswordMismatch => "password_mismatch",
            AuthError::HashingFailure(_) => "hashing_failure",
            AuthError::Storage(_) => "storage",
            AuthError::Config(_) => "config",
        }
    }

    /// True for faults of this service rather than of the presented credential
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AuthError::HashingFailure(_) | AuthError::Storage(_) | AuthError::Config(_)
        )
    }

    /// A refresh token that exists but can no longer be used
    pub fn is_expired_or_revoked(&self) -> bool {
        matches!(self, AuthError::ExpiredToken | AuthError::RevokedToken)
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(e: sqlx::Error) -> Self {
        AuthError::Storage(e.to_string())
    }
}
