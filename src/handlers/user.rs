//! 用户相关的 HTTP 处理器

use crate::{
    auth::AuthContext,
    error::AppError,
    middleware::AppState,
    models::user::CredentialsRequest,
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use validator::Validate;

/// 注册
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate().map_err(|e| AppError::validation(&e))?;

    let user = state.user_service.register(&req.email, &req.password).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// 更新当前用户的邮箱与密码（需要 Bearer 访问令牌）
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    Json(req): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate().map_err(|e| AppError::validation(&e))?;

    let user = state
        .user_service
        .update_credentials(ctx.user_id, &req.email, &req.password)
        .await?;

    Ok(Json(user))
}
