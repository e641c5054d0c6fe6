// ==========================================
// KCCR 产品目录 - 产品导入 Trait
// ==========================================
// 职责: 定义产品导入接口（不包含实现）
// ==========================================

use crate::domain::ImportSummary;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::sheet::{ParsedSheet, SheetRow};
use async_trait::async_trait;
use std::path::Path;

/// 工作表选择策略
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SheetSelector {
    /// 第一张工作表
    #[default]
    First,
    /// 指定名称，不存在即报错
    Named(String),
    /// 优先指定名称，不存在回退第一张
    Prefer(String),
}

// ==========================================
// ProductImporter Trait
// ==========================================
// 用途: 产品批量导入主接口
// 实现者: ProductImporterImpl
#[async_trait]
pub trait ProductImporter: Send + Sync {
    /// 导入已解析的行
    ///
    /// # 参数
    /// - rows: 原始行
    /// - headers: 检测到的表头（用于汇总与错误回显）
    ///
    /// # 返回
    /// - Ok(ImportSummary): 导入汇总
    /// - Err(NoValidRows): 没有任何有效行
    /// - Err(BatchInsertFailed): 某批插入失败（携带已提交进度）
    ///
    /// # 流程
    /// 1. 逐行规范化（无效行计入拒绝数）
    /// 2. 有效行按批次大小切分
    /// 3. 各批顺序插入（INSERT OR IGNORE），累加插入数
    async fn import_rows(&self, rows: &[SheetRow], headers: &[String]) -> ImportResult<ImportSummary>;

    /// 从上传的文件内容导入（第一张工作表）
    ///
    /// # 返回
    /// - Err(EmptySheet): 工作表没有数据行
    async fn import_from_bytes(&self, file_name: &str, bytes: &[u8]) -> ImportResult<ImportSummary>;

    /// 从本地文件导入
    async fn import_from_path(&self, path: &Path, sheet: &SheetSelector) -> ImportResult<ImportSummary>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口
// 实现者: ExcelParser, CsvParser, UniversalFileParser
pub trait FileParser: Send + Sync {
    /// 解析文件内容
    ///
    /// # 参数
    /// - file_name: 原始文件名（用于判断格式）
    /// - bytes: 文件内容
    /// - sheet: 工作表选择策略（CSV 忽略）
    fn parse_bytes(&self, file_name: &str, bytes: &[u8], sheet: &SheetSelector) -> ImportResult<ParsedSheet>;

    /// 解析本地文件
    fn parse_path(&self, path: &Path, sheet: &SheetSelector) -> ImportResult<ParsedSheet> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        self.parse_bytes(file_name, &bytes, sheet)
    }
}
