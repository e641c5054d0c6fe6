use axum::extract::{Multipart, State};
use axum::Json;

use crate::api::{ApiError, ApiResult, ImportApiResponse};
use crate::app::state::AppState;

// ==========================================
// 产品导入
// ==========================================

/// 上传字段名
const UPLOAD_FIELD: &str = "file";

/// POST /api/admin/productos/import-excel（multipart，字段 `file`）
pub async fn import_products(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<ImportApiResponse>> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidInput(e.body_text()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidInput(e.body_text()))?;
        upload = Some((file_name, bytes.to_vec()));
        break;
    }

    let (file_name, bytes) = match &upload {
        Some((name, bytes)) => (name.as_str(), Some(bytes.as_slice())),
        None => ("", None),
    };
    tracing::info!(file = %file_name, "[import_products] 收到请求");

    let response = state.import_api.import_upload(file_name, bytes).await?;
    tracing::info!(
        inserted = response.total_inserted,
        batches = response.batches,
        "[import_products] 导入成功"
    );
    Ok(Json(response))
}
