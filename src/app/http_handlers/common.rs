use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::api::{ApiError, ApiResult};

// ==========================================
// 公共工具: 请求体提取错误映射
// ==========================================

/// JSON 请求体解析失败 → 400（统一 {message} 格式）
pub(super) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| ApiError::InvalidInput(e.body_text()))
}

/// 在阻塞线程池执行（argon2 哈希等 CPU 密集调用）
pub(super) async fn run_blocking<T, F>(task: F) -> ApiResult<T>
where
    F: FnOnce() -> ApiResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| ApiError::InternalError(format!("任务执行失败: {}", e)))?
}
