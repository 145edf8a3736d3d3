//! 支付回调（Polka webhook）处理器

use crate::{
    error::AppError,
    middleware::AppState,
    models::user::{PolkaWebhook, USER_UPGRADED_EVENT},
};
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use uuid::Uuid;

/// 会员升级回调；调用方已通过 ApiKey 认证
pub async fn polka_webhook(
    State(state): State<Arc<AppState>>,
    Json(webhook): Json<PolkaWebhook>,
) -> Result<StatusCode, AppError> {
    // 其他事件直接确认，不做处理
    if webhook.event != USER_UPGRADED_EVENT {
        tracing::debug!(event = %webhook.event, "Ignoring webhook event");
        return Ok(StatusCode::NO_CONTENT);
    }

    let user_id = Uuid::parse_str(&webhook.data.user_id)
        .map_err(|_| AppError::BadRequest("Invalid user_id".to_string()))?;

    state.user_service.upgrade_to_chirpy_red(user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
