//! 认证相关的 HTTP 处理器

use crate::{
    auth::authorization_value,
    error::AppError,
    middleware::AppState,
    models::auth::{LoginRequest, LoginResponse, RefreshResponse},
};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use validator::Validate;

/// 登录
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate().map_err(|e| AppError::validation(&e))?;

    let session = state.auth_service.login(&req.email, &req.password).await?;

    Ok(Json(LoginResponse::from(session)))
}

/// 刷新访问令牌（Authorization: Bearer <refresh_token>）
pub async fn refresh_token(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let header = authorization_value(&headers)?;
    let grant = state.auth_service.refresh(header).await?;

    Ok(Json(RefreshResponse::from(grant)))
}

/// 撤销刷新令牌（Authorization: Bearer <refresh_token>）
pub async fn revoke_token(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let header = authorization_value(&headers)?;
    state.auth_service.revoke(header).await?;

    Ok(StatusCode::NO_CONTENT)
}

