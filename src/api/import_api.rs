// ==========================================
// KCCR 产品目录 - 产品导入 API
// ==========================================
// 职责: 上传表格 → 导入器 → 汇总响应
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::ImportSummary;
use crate::i18n::t;
use crate::importer::ProductImporter;

/// 导入 API 响应（键名与管理端前端一致）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportApiResponse {
    pub message: String,
    /// 原始行数
    #[serde(rename = "totalFilas")]
    pub total_rows: usize,
    /// 有效行数
    #[serde(rename = "totalValidas")]
    pub total_valid: usize,
    /// 被丢弃行数
    #[serde(rename = "totalRechazadas")]
    pub total_rejected: usize,
    /// 实际插入行数
    #[serde(rename = "totalInsertados")]
    pub total_inserted: usize,
    /// 提交批次数
    #[serde(rename = "lotes")]
    pub batches: usize,
    #[serde(rename = "headersDetectados")]
    pub headers: Vec<String>,
}

impl ImportApiResponse {
    fn completed(summary: ImportSummary) -> Self {
        Self {
            message: t("import.completed"),
            total_rows: summary.total_rows,
            total_valid: summary.total_valid,
            total_rejected: summary.total_rejected,
            total_inserted: summary.total_inserted,
            batches: summary.batches,
            headers: summary.headers,
        }
    }
}

/// 导入 API
pub struct ImportApi {
    importer: Arc<dyn ProductImporter>,
}

impl ImportApi {
    pub fn new(importer: Arc<dyn ProductImporter>) -> Self {
        Self { importer }
    }

    /// 导入上传的文件
    ///
    /// # 参数
    /// - file_name: 上传时的原始文件名（决定解析格式）
    /// - bytes: 文件内容；None 表示请求中没有 `file` 字段
    pub async fn import_upload(&self, file_name: &str, bytes: Option<&[u8]>) -> ApiResult<ImportApiResponse> {
        let bytes = bytes.ok_or_else(|| ApiError::InvalidInput(t("import.file_missing")))?;
        info!(file = %file_name, size = bytes.len(), "收到产品导入文件");

        let summary = self.importer.import_from_bytes(file_name, bytes).await?;
        Ok(ImportApiResponse::completed(summary))
    }
}
