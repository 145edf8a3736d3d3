//! 路由注册
//! 创建认证 API 路由并应用中间件

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;

use crate::{
    auth::{api_key_auth_middleware, bearer_auth_middleware},
    handlers,
    middleware::AppState,
};

/// 请求体上限
const MAX_BODY_BYTES: usize = 16 * 1024;

/// 创建应用路由
pub fn create_router(state: Arc<AppState>) -> Router {
    // 公开端点（健康检查）
    let public_routes = Router::new().route("/admin/healthz", get(handlers::health::healthz));

    // 认证路由：登录凭据在请求体中，刷新/撤销令牌在 Authorization 头中
    let auth_routes = Router::new()
        .route("/api/login", post(handlers::auth::login))
        .route("/api/refresh", post(handlers::auth::refresh_token))
        .route("/api/revoke", post(handlers::auth::revoke_token))
        .route("/api/users", post(handlers::user::create_user));

    // 需要访问令牌的路由
    let user_routes = require_bearer(
        state.clone(),
        Router::new().route("/api/users", put(handlers::user::update_user)),
    );

    // webhook 路由（ApiKey）
    let webhook_routes = require_api_key(
        state.clone(),
        Router::new().route("/api/polka/webhooks", post(handlers::webhook::polka_webhook)),
    );

    Router::new()
        .merge(public_routes)
        .merge(auth_routes)
        .merge(user_routes)
        .merge(webhook_routes)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(axum::middleware::from_fn(crate::middleware::request_tracking_middleware))
        .with_state(state)
}

/// 为资源路由加上 Bearer 访问令牌认证，handler 可提取 `AuthContext`
pub fn require_bearer(state: Arc<AppState>, routes: Router<Arc<AppState>>) -> Router<Arc<AppState>> {
    routes.route_layer(axum::middleware::from_fn_with_state(state, bearer_auth_middleware))
}

/// 为 webhook 路由加上 ApiKey 认证
pub fn require_api_key(
    state: Arc<AppState>,
    routes: Router<Arc<AppState>>,
) -> Router<Arc<AppState>> {
    routes.route_layer(axum::middleware::from_fn_with_state(state, api_key_auth_middleware))
}
