use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::api::{ApiResult, CreateUserRequest, CreateUserResponse, MessageResponse, UpdateUserRequest};
use crate::app::state::AppState;
use crate::auth::Claims;
use crate::domain::UserSummary;

use super::common::{json_body, run_blocking};

// ==========================================
// 管理员用户
// ==========================================

/// POST /api/admin/usuarios
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CreateUserResponse>)> {
    let request = json_body(payload)?;
    let user_api = state.user_api.clone();
    let response = run_blocking(move || user_api.create_user(&request)).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/admin/usuarios
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserSummary>>> {
    Ok(Json(state.user_api.list_users()?))
}

/// PUT /api/admin/usuarios/{id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> ApiResult<Json<UserSummary>> {
    let request = json_body(payload)?;
    let user_api = state.user_api.clone();
    let user = run_blocking(move || user_api.update_user(&id, &request)).await?;
    Ok(Json(user))
}

/// DELETE /api/admin/usuarios/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    Ok(Json(state.user_api.delete_user(&id, claims.id)?))
}
