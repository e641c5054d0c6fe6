use std::collections::HashMap;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::Value as JsonValue;

use crate::api::{ApiResult, MessageResponse, CSV_EXPORT_FILE_NAME, XLSX_EXPORT_FILE_NAME};
use crate::app::state::AppState;
use crate::domain::{Page, Product};

use super::common::json_body;

// ==========================================
// 门户: 产品只读接口
// ==========================================

/// GET /api/productos
pub async fn list_products(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    Ok(Json(state.product_api.list_products().await?))
}

/// GET /api/productos/paged?page=&pageSize=
pub async fn list_products_paged(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<Page<Product>>> {
    let page = state
        .product_api
        .list_products_paged(
            params.get("page").map(String::as_str),
            params.get("pageSize").map(String::as_str),
        )
        .await?;
    Ok(Json(page))
}

/// GET /api/productos/search
pub async fn search_products(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<Vec<Product>>> {
    Ok(Json(state.product_api.search_products(&params).await?))
}

/// GET /api/productos/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    Ok(Json(state.product_api.get_product(&id).await?))
}

/// xlsx 响应类型
const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// GET /api/productos/export/excel
pub async fn export_products_excel(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let bytes = state.product_api.export_xlsx().await?;
    let disposition = format!("attachment; filename=\"{}\"", XLSX_EXPORT_FILE_NAME);
    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

/// GET /api/productos/export/csv
pub async fn export_products_csv(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let bytes = state.product_api.export_csv().await?;
    let disposition = format!("attachment; filename=\"{}\"", CSV_EXPORT_FILE_NAME);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

// ==========================================
// 管理端: 产品 CRUD
// ==========================================

/// POST /api/admin/productos
pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<JsonValue>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let body = json_body(payload)?;
    let product = state.product_api.create_product(&body).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /api/admin/productos/{id}
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<JsonValue>, JsonRejection>,
) -> ApiResult<Json<Product>> {
    let body = json_body(payload)?;
    Ok(Json(state.product_api.update_product(&id, &body).await?))
}

/// DELETE /api/admin/productos/{id}
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    Ok(Json(state.product_api.delete_product(&id).await?))
}
