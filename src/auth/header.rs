//! `Authorization` header parsing
//!
//! Two mutually exclusive schemes are recognised by exact, case-sensitive
//! prefix: `Bearer <token>` for end users and `ApiKey <key>` for the webhook
//! caller.

use crate::auth::error::AuthError;
use axum::http::{header::AUTHORIZATION, HeaderMap};

pub const BEARER_PREFIX: &str = "Bearer ";
pub const API_KEY_PREFIX: &str = "ApiKey ";

/// Extract the bearer credential from an `Authorization` header value
pub fn extract_bearer(value: &str) -> Result<&str, AuthError> {
    extract_with_prefix(value, BEARER_PREFIX)
}

/// Extract the static API key from an `Authorization` header value
pub fn extract_api_key(value: &str) -> Result<&str, AuthError> {
    extract_with_prefix(value, API_KEY_PREFIX)
}

/// Raw `Authorization` value; an absent header reads as empty
pub fn authorization_value(headers: &HeaderMap) -> Result<&str, AuthError> {
    match headers.get(AUTHORIZATION) {
        None => Ok(""),
        Some(value) => value.to_str().map_err(|_| AuthError::MalformedCredential),
    }
}

fn extract_with_prefix<'a>(value: &'a str, prefix: &str) -> Result<&'a str, AuthError> {
    if value.is_empty() {
        return Err(AuthError::MissingCredential);
    }

    let credential = value
        .strip_prefix(prefix)
        .ok_or(AuthError::MalformedCredential)?
        .trim();

    if credential.is_empty() {
        return Err(AuthError::MalformedCredential);
    }

    Ok(credential)
}
