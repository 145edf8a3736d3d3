//! Database repository layer

pub mod refresh_token_repo;
pub mod user_repo;

pub use refresh_token_repo::*;
pub use user_repo::*;

use crate::auth::error::AuthError;
use std::{future::Future, time::Duration};

/// Run a storage call under a deadline; elapsing counts as a storage fault
pub async fn with_timeout<T, F>(limit: Duration, call: F) -> Result<T, AuthError>
where
    F: Future<Output = Result<T, AuthError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(timeout_ms = limit.as_millis() as u64, "Storage call timed out");
            Err(AuthError::Storage("storage call timed out".to_string()))
        }
    }
}
