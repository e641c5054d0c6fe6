use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;

use crate::api::{ApiResult, MessageResponse, NewsRequest};
use crate::app::state::AppState;
use crate::auth::Claims;
use crate::domain::News;

use super::common::json_body;

// ==========================================
// 新闻
// ==========================================

#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    pub destino: Option<String>,
}

/// GET /api/noticias?destino=
pub async fn list_news(
    State(state): State<AppState>,
    Query(query): Query<NewsQuery>,
) -> ApiResult<Json<Vec<News>>> {
    Ok(Json(state.news_api.list_news(query.destino.as_deref())?))
}

/// GET /api/noticias/{id}
pub async fn get_news(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<News>> {
    Ok(Json(state.news_api.get_news(&id)?))
}

/// POST /api/admin/noticias
pub async fn create_news(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<NewsRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<News>)> {
    let request = json_body(payload)?;
    let news = state.news_api.create_news(&request, claims.id)?;
    Ok((StatusCode::CREATED, Json(news)))
}

/// PUT /api/admin/noticias/{id}
pub async fn update_news(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<NewsRequest>, JsonRejection>,
) -> ApiResult<Json<News>> {
    let request = json_body(payload)?;
    Ok(Json(state.news_api.update_news(&id, &request)?))
}

/// DELETE /api/admin/noticias/{id}
pub async fn delete_news(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    Ok(Json(state.news_api.delete_news(&id)?))
}
