use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value as JsonValue};

use crate::api::{ApiResult, LoginRequest, LoginResponse};
use crate::app::state::AppState;
use crate::i18n::t;

use super::common::{json_body, run_blocking};

// ==========================================
// 健康检查与认证
// ==========================================

/// GET /api/health
pub async fn health() -> Json<JsonValue> {
    Json(json!({ "status": "OK", "message": t("common.health_ok") }))
}

/// POST /api/auth/register（公开注册已关闭，恒为 403）
pub async fn register(State(state): State<AppState>) -> ApiResult<Json<JsonValue>> {
    state.auth_api.register()?;
    Ok(Json(JsonValue::Null))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let request = json_body(payload)?;
    let auth_api = state.auth_api.clone();
    let response = run_blocking(move || auth_api.login(&request)).await?;
    Ok(Json(response))
}
