// ==========================================
// KCCR 产品目录 - 产品 API
// ==========================================
// 职责: 产品查询（门户只读）、管理端 CRUD、Excel / CSV 导出
// 红线: 写入前必须经过白名单清洗
// ==========================================

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value as JsonValue;
use rust_xlsxwriter::{Workbook, XlsxError};
use tracing::{debug, info};

use crate::api::error::{ApiError, ApiResult};
use crate::api::response::MessageResponse;
use crate::api::validator::parse_positive_id;
use crate::domain::{
    sanitize_product_payload, Page, PageRequest, Product, ProductField, ProductPatch, PRODUCT_FIELDS,
};
use crate::engine::build_filter;
use crate::i18n::t;
use crate::repository::ProductRepository;

/// Excel 导出文件名
pub const XLSX_EXPORT_FILE_NAME: &str = "productos.xlsx";
/// Excel 导出工作表名
pub const XLSX_EXPORT_SHEET: &str = "Productos";
/// CSV 导出文件名
pub const CSV_EXPORT_FILE_NAME: &str = "productos.csv";

// ==========================================
// ProductApi - 产品 API
// ==========================================
pub struct ProductApi {
    product_repo: Arc<dyn ProductRepository>,
}

impl ProductApi {
    pub fn new(product_repo: Arc<dyn ProductRepository>) -> Self {
        Self { product_repo }
    }

    // ==========================================
    // 门户只读接口
    // ==========================================

    /// 全量列表（按品牌、名称排序）
    pub async fn list_products(&self) -> ApiResult<Vec<Product>> {
        Ok(self.product_repo.list_all().await?)
    }

    /// 分页列表
    ///
    /// # 参数
    /// - page / page_size: 原始查询参数（缺失或非法时取默认值）
    pub async fn list_products_paged(
        &self,
        page: Option<&str>,
        page_size: Option<&str>,
    ) -> ApiResult<Page<Product>> {
        let request = PageRequest::from_params(page, page_size);
        Ok(self.product_repo.list_paged(request).await?)
    }

    /// 多条件检索
    pub async fn search_products(&self, params: &HashMap<String, String>) -> ApiResult<Vec<Product>> {
        let filter = build_filter(params);
        debug!(filter = ?filter, "产品检索");
        Ok(self.product_repo.search(&filter).await?)
    }

    /// 按 id 查询；id 非正整数同样返回 404
    pub async fn get_product(&self, raw_id: &str) -> ApiResult<Product> {
        let id = parse_positive_id(raw_id).ok_or_else(|| ApiError::NotFound(t("product.not_found")))?;
        self.product_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(t("product.not_found")))
    }

    /// 导出全部产品为 xlsx（工作表 "Productos"，首列 id，其余按白名单顺序）
    pub async fn export_xlsx(&self) -> ApiResult<Vec<u8>> {
        let products = self.product_repo.list_all().await?;
        let bytes = write_products_xlsx(&products).map_err(|e| ApiError::InternalError(e.to_string()))?;
        info!(rows = products.len(), size = bytes.len(), "产品 Excel 导出完成");
        Ok(bytes)
    }

    /// 导出全部产品为 CSV（UTF-8，首列 id，其余按白名单顺序）
    pub async fn export_csv(&self) -> ApiResult<Vec<u8>> {
        let products = self.product_repo.list_all().await?;
        let bytes = write_products_csv(&products)?;
        info!(rows = products.len(), size = bytes.len(), "产品 CSV 导出完成");
        Ok(bytes)
    }

    // ==========================================
    // 管理端接口
    // ==========================================

    /// 新建产品（品牌、名称必填）
    pub async fn create_product(&self, payload: &JsonValue) -> ApiResult<Product> {
        let record = sanitize_product_payload(payload).into_record();
        if !record.is_importable() {
            return Err(ApiError::InvalidInput(t("product.required_fields")));
        }
        let product = self.product_repo.create(&record).await?;
        info!(id = product.id, "产品已创建");
        Ok(product)
    }

    /// 局部更新产品
    ///
    /// payload 中未出现的字段保持不变；品牌或名称不能被清空
    pub async fn update_product(&self, raw_id: &str, payload: &JsonValue) -> ApiResult<Product> {
        let id = parse_positive_id(raw_id).ok_or_else(|| ApiError::InvalidInput(t("common.invalid_id")))?;
        let patch = sanitize_product_payload(payload);
        if clears_required_field(&patch) {
            return Err(ApiError::InvalidInput(t("product.required_fields")));
        }
        let product = self
            .product_repo
            .update(id, &patch)
            .await?
            .ok_or_else(|| ApiError::NotFound(t("product.not_found")))?;
        info!(id, fields = patch.fields.len(), "产品已更新");
        Ok(product)
    }

    pub async fn delete_product(&self, raw_id: &str) -> ApiResult<MessageResponse> {
        let id = parse_positive_id(raw_id).ok_or_else(|| ApiError::InvalidInput(t("common.invalid_id")))?;
        if !self.product_repo.delete(id).await? {
            return Err(ApiError::NotFound(t("product.not_found")));
        }
        info!(id, "产品已删除");
        Ok(MessageResponse::new(t("product.deleted")))
    }
}

fn clears_required_field(patch: &ProductPatch) -> bool {
    patch.fields.iter().any(|(field, value)| {
        matches!(field, ProductField::Brand | ProductField::Name) && value.is_none()
    })
}

/// 表头: id + 13 个字段的 JSON 键
fn export_header() -> Vec<&'static str> {
    let mut header = vec!["id"];
    header.extend(PRODUCT_FIELDS.iter().map(|f| f.json_key()));
    header
}

/// 空字段留空单元格
fn write_products_xlsx(products: &[Product]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(XLSX_EXPORT_SHEET)?;

    for (col, title) in export_header().into_iter().enumerate() {
        sheet.write_string(0, col as u16, title)?;
    }

    for (idx, product) in products.iter().enumerate() {
        let row = (idx + 1) as u32;
        sheet.write_number(row, 0, product.id as f64)?;
        for (offset, field) in PRODUCT_FIELDS.iter().enumerate() {
            if let Some(value) = product.record.get(*field) {
                sheet.write_string(row, (offset + 1) as u16, value)?;
            }
        }
    }

    workbook.save_to_buffer()
}

fn write_products_csv(products: &[Product]) -> ApiResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(export_header())
        .map_err(|e| ApiError::InternalError(e.to_string()))?;

    for product in products {
        let mut row = vec![product.id.to_string()];
        row.extend(
            PRODUCT_FIELDS
                .iter()
                .map(|f| product.record.get(*f).unwrap_or_default().to_string()),
        );
        writer
            .write_record(&row)
            .map_err(|e| ApiError::InternalError(e.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| ApiError::InternalError(e.to_string()))
}
