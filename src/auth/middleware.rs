//! 认证中间件
//! Bearer 访问令牌（终端用户）与 ApiKey（webhook 调用方）两种方案

use crate::{auth::header::authorization_value, error::AppError, middleware::AppState};
use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use uuid::Uuid;

/// 认证上下文（附加到请求扩展）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: Uuid,
}

// 实现 FromRequestParts 以便在 handler 中直接提取 AuthContext
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .copied()
            .ok_or(AppError::Unauthorized)
    }
}

/// Bearer 认证中间件 - 必须携带有效访问令牌
pub async fn bearer_auth_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = authorization_value(req.headers())?;
    let user_id = state.auth_service.authenticate_request(header).await?;

    req.extensions_mut().insert(AuthContext { user_id });

    Ok(next.run(req).await)
}

/// ApiKey 认证中间件 - 仅用于 webhook 路由
pub async fn api_key_auth_middleware(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = authorization_value(req.headers())?;
    state.auth_service.authenticate_webhook(header).await?;

    tracing::debug!("Webhook API key validated");
    Ok(next.run(req).await)
}
