//! 健康检查处理器

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;

/// 存活探针
pub async fn healthz() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        "OK",
    )
}
