// ==========================================
// KCCR 产品目录 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::importer::header_resolver::Presence;
use async_trait::async_trait;
use std::error::Error;

/// 每批插入的默认行数
pub const DEFAULT_IMPORT_BATCH_SIZE: usize = 200;

pub type ConfigReadError = Box<dyn Error + Send + Sync>;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入模块所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// 获取每批插入行数
    ///
    /// # 默认值
    /// - 200（非法或 0 时同样回退）
    async fn get_import_batch_size(&self) -> Result<usize, ConfigReadError>;

    /// 获取导入时表头命中严格度
    ///
    /// # 默认值
    /// - Presence::Defined
    async fn get_header_presence(&self) -> Result<Presence, ConfigReadError>;
}
