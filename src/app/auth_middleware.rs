// ==========================================
// KCCR 产品目录 - 管理端鉴权中间件
// ==========================================
// 职责: 校验 `Authorization: Bearer <token>` 并要求 admin 角色，
//       通过后把 Claims 放入请求扩展供处理器读取
// ==========================================

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use crate::api::ApiError;
use crate::app::state::AppState;

/// 管理端路由中间件
///
/// - 缺少/无效令牌 → 401
/// - 非管理员 → 403
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let claims = state.auth_api.authorize_admin(header)?;
    tracing::debug!(user_id = claims.id, path = %request.uri().path(), "管理端请求已授权");

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}
